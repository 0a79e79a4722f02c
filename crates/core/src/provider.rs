//! Identity-provider URL resolution.

/// Production identity-provider endpoint.
pub const PRODUCTION_PROVIDER_URL: &str = "https://identity.ic0.app";

/// Local development replica endpoint.
pub const DEV_PROVIDER_URL: &str = "http://localhost:4943";

/// Environment variable consulted at build time and at runtime.
pub const PROVIDER_URL_ENV: &str = "IDS_IDENTITY_PROVIDER";

/// Resolves the identity-provider URL used for login handshakes.
///
/// Precedence: build-time override, then runtime environment override, then
/// the localhost development fallback (debug builds only), then the
/// production default. Every tier is injectable so tests can pin each one.
#[derive(Debug, Clone)]
pub struct ProviderResolver {
	build_override: Option<String>,
	env_var: String,
	dev_fallback: bool,
	production_url: String,
}

impl Default for ProviderResolver {
	fn default() -> Self {
		Self {
			build_override: option_env!("IDS_IDENTITY_PROVIDER").map(str::to_string),
			env_var: PROVIDER_URL_ENV.to_string(),
			dev_fallback: cfg!(debug_assertions),
			production_url: PRODUCTION_PROVIDER_URL.to_string(),
		}
	}
}

impl ProviderResolver {
	/// Resolver pinned to a fixed URL, bypassing every other tier.
	pub fn fixed(url: impl Into<String>) -> Self {
		Self {
			build_override: Some(url.into()),
			..Self::default()
		}
	}

	/// Sets the environment variable consulted at runtime.
	pub fn with_env_var(mut self, name: impl Into<String>) -> Self {
		self.env_var = name.into();
		self
	}

	/// Enables or disables the localhost development fallback.
	pub fn with_dev_fallback(mut self, enabled: bool) -> Self {
		self.dev_fallback = enabled;
		self
	}

	/// Replaces the production default URL.
	pub fn with_production_url(mut self, url: impl Into<String>) -> Self {
		self.production_url = url.into();
		self
	}

	/// Resolves the provider URL by precedence.
	pub fn resolve(&self) -> String {
		if let Some(url) = &self.build_override {
			return url.clone();
		}
		if let Ok(url) = std::env::var(&self.env_var) {
			if !url.is_empty() {
				return url;
			}
		}
		if self.dev_fallback {
			return DEV_PROVIDER_URL.to_string();
		}
		self.production_url.clone()
	}
}
