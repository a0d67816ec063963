use actix_web::HttpRequest;

/// The caller's address: first `X-Forwarded-For` hop when trusted, else the peer address.
pub fn get_client_ip(req: &HttpRequest, trust_x_forwarded_for: bool) -> Option<String> {
    if trust_x_forwarded_for {
        let first_hop = req
            .headers()
            .get("x-forwarded-for")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(',').next())
            .map(str::trim)
            .filter(|hop| !hop.is_empty());
        if let Some(hop) = first_hop {
            return Some(hop.to_string());
        }
    }
    req.peer_addr().map(|addr| addr.ip().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn forwarded_header_only_counts_when_trusted() {
        let req = TestRequest::default()
            .insert_header(("x-forwarded-for", "203.0.113.9, 10.0.0.1"))
            .peer_addr("127.0.0.1:9000".parse().unwrap())
            .to_http_request();

        assert_eq!(get_client_ip(&req, true).as_deref(), Some("203.0.113.9"));
        assert_eq!(get_client_ip(&req, false).as_deref(), Some("127.0.0.1"));
    }
}
