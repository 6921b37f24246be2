use secrecy::SecretString;

/// Process-wide configuration, parsed once at startup and passed to the functions.
#[derive(Clone)]
pub struct GlobalArgs {
    pub idp_domain: String,
    pub idp_client_id: String,
    pub idp_client_secret: SecretString,
    pub platform_url: String,
    pub platform_token: Option<SecretString>,
    pub auth_profile_id: String,
}

impl GlobalArgs {
    #[must_use]
    pub fn new(
        idp_domain: String,
        idp_client_id: String,
        platform_url: String,
        auth_profile_id: String,
    ) -> Self {
        Self {
            idp_domain,
            idp_client_id,
            idp_client_secret: SecretString::default(),
            platform_url,
            platform_token: None,
            auth_profile_id,
        }
    }

    pub fn set_idp_client_secret(&mut self, secret: SecretString) {
        self.idp_client_secret = secret;
    }

    pub fn set_platform_token(&mut self, token: SecretString) {
        self.platform_token = Some(token);
    }
}

impl std::fmt::Debug for GlobalArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlobalArgs")
            .field("idp_domain", &self.idp_domain)
            .field("idp_client_id", &self.idp_client_id)
            .field("idp_client_secret", &"***")
            .field("platform_url", &self.platform_url)
            .field("platform_token", &self.platform_token.as_ref().map(|_| "***"))
            .field("auth_profile_id", &self.auth_profile_id)
            .finish()
    }
}
