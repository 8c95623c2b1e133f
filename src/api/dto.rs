use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub struct ResetPasswordRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
    pub new_password: &'a str,
}
