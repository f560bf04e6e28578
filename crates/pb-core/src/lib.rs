//! postboard/crates/pb-core/src/lib.rs
//!
//! The central domain types and interface definitions for Postboard.

pub mod models;
pub mod traits;
pub mod error;

// Re-exporting for easier access in other crates
pub use models::*;
pub use traits::*;
pub use error::*;


#[cfg(test)]
mod tests {
    use super::models::*;
    use super::error::AppError;

    fn sample_post() -> Post {
        Post {
            id: 1,
            title: "Hello".to_string(),
            content: "Hello Rust!".to_string(),
            user_id: 7,
        }
    }

    #[test]
    fn test_patch_keeps_absent_fields() {
        let mut post = sample_post();
        PostPatch { title: Some("new".into()), content: None }.apply(&mut post);
        assert_eq!(post.title, "new");
        assert_eq!(post.content, "Hello Rust!");
    }

    #[test]
    fn test_empty_patch_is_noop() {
        let mut post = sample_post();
        PostPatch::default().apply(&mut post);
        assert_eq!(post, sample_post());
    }

    #[test]
    fn test_user_never_serializes_password() {
        let user = User {
            id: 1,
            username: "alice".into(),
            password_hash: "$argon2id$secret".into(),
            role_id: None,
        };
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["username"], "alice");
    }

    #[test]
    fn test_not_found_message() {
        let err = AppError::not_found("Post", 42);
        assert_eq!(err.to_string(), "Post not found with ID 42");
    }
}
