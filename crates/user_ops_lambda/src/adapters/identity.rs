use async_trait::async_trait;
use aws_sdk_cognitoidentityprovider::error::DisplayErrorContext;
use aws_sdk_cognitoidentityprovider::Client;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdentityError {
    #[error("user not found")]
    UserNotFound,
    #[error("{0}")]
    Service(String),
}

/// Admin operations against a user pool.
#[async_trait]
pub trait IdentityService: Send + Sync {
    async fn admin_delete_user(&self, user_pool_id: &str, username: &str)
        -> Result<(), IdentityError>;
}

#[derive(Debug, Clone)]
pub struct CognitoIdentityService {
    client: Client,
}

impl CognitoIdentityService {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl IdentityService for CognitoIdentityService {
    async fn admin_delete_user(
        &self,
        user_pool_id: &str,
        username: &str,
    ) -> Result<(), IdentityError> {
        match self
            .client
            .admin_delete_user()
            .user_pool_id(user_pool_id)
            .username(username)
            .send()
            .await
        {
            Ok(_) => Ok(()),
            Err(error) => {
                let service_error = error.into_service_error();
                if service_error.is_user_not_found_exception() {
                    Err(IdentityError::UserNotFound)
                } else {
                    Err(IdentityError::Service(
                        DisplayErrorContext(&service_error).to_string(),
                    ))
                }
            }
        }
    }
}
