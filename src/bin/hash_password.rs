//! Prints an argon2 hash for `APP_ADMIN_PASSWORD_HASH`.
//!
//! Usage: `hash_password <password>` or pipe the password on stdin.

use std::io::{self, BufRead};

use portfolio_cms::auth::password::hash_password;

fn main() {
    let password = match std::env::args().nth(1) {
        Some(password) => password,
        None => {
            let mut line = String::new();
            if let Err(e) = io::stdin().lock().read_line(&mut line) {
                eprintln!("Failed to read password: {}", e);
                std::process::exit(1);
            }
            line.trim_end_matches(['\r', '\n']).to_string()
        }
    };

    if password.is_empty() {
        eprintln!("Password cannot be empty");
        std::process::exit(1);
    }

    match hash_password(&password) {
        Ok(hash) => println!("{}", hash),
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}
