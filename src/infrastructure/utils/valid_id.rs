use bson::oid::ObjectId;

use crate::errors::AppError;

/// Parses a document id, rejecting anything that is not a 24-hex-character object id.
pub fn valid_id(id: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(id).map_err(|_| AppError::BadRequest("Invalid ID format".to_string()))
}
