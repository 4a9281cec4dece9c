//! Password providers consulted only when a network login is about to happen.
//!
//! [`CredentialProvider`] is the single abstraction for both eagerly known and lazily fetched
//! passwords: a [`Password`] resolves immediately, while [`from_fn`] wraps an async closure that
//! may hit a secret store. The client never calls a provider on a cache hit.

// self
use crate::{_prelude::*, auth::Password};

/// Boxed future returned by [`CredentialProvider::password`].
pub type CredentialFuture<'a> =
	Pin<Box<dyn Future<Output = Result<Password, CredentialError>> + 'a + Send>>;

/// Asynchronous source of the login password.
pub trait CredentialProvider
where
	Self: Send + Sync,
{
	/// Resolves the password for the next login attempt.
	fn password(&self) -> CredentialFuture<'_>;
}

/// Failure raised by a [`CredentialProvider`].
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum CredentialError {
	/// The secret could not be retrieved.
	#[error("Credentials are unavailable: {message}.")]
	Unavailable {
		/// Provider-supplied reason.
		message: String,
	},
}
impl CredentialError {
	/// Builds an [`CredentialError::Unavailable`] from any displayable reason.
	pub fn unavailable(message: impl Into<String>) -> Self {
		Self::Unavailable { message: message.into() }
	}
}

impl CredentialProvider for Password {
	fn password(&self) -> CredentialFuture<'_> {
		let password = self.clone();

		Box::pin(async move { Ok(password) })
	}
}

/// Provider backed by an async closure, invoked once per network login.
pub struct FnCredentialProvider<F>(F);
impl<F, Fut> CredentialProvider for FnCredentialProvider<F>
where
	F: Send + Sync + Fn() -> Fut,
	Fut: 'static + Send + Future<Output = Result<Password, CredentialError>>,
{
	fn password(&self) -> CredentialFuture<'_> {
		Box::pin((self.0)())
	}
}
impl<F> Debug for FnCredentialProvider<F> {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("FnCredentialProvider(..)")
	}
}

/// Wraps an async closure as a deferred [`CredentialProvider`].
pub fn from_fn<F, Fut>(f: F) -> FnCredentialProvider<F>
where
	F: Send + Sync + Fn() -> Fut,
	Fut: 'static + Send + Future<Output = Result<Password, CredentialError>>,
{
	FnCredentialProvider(f)
}

#[cfg(test)]
mod tests {
	// std
	use std::sync::atomic::{AtomicUsize, Ordering};
	// self
	use super::*;

	#[tokio::test]
	async fn password_resolves_immediately() {
		let provider = Password::new("eager");
		let resolved = provider.password().await.expect("Eager password should always resolve.");

		assert_eq!(resolved.expose(), "eager");
	}

	#[tokio::test]
	async fn closure_provider_runs_on_every_call() {
		let calls = Arc::new(AtomicUsize::new(0));
		let counter = calls.clone();
		let provider = from_fn(move || {
			let n = counter.fetch_add(1, Ordering::SeqCst);

			async move { Ok(Password::new(format!("secret-{n}"))) }
		});

		assert_eq!(calls.load(Ordering::SeqCst), 0, "Building a provider must not fetch secrets.");

		let first = provider.password().await.expect("First lookup should succeed.");
		let second = provider.password().await.expect("Second lookup should succeed.");

		assert_eq!(first.expose(), "secret-0");
		assert_eq!(second.expose(), "secret-1");
		assert_eq!(calls.load(Ordering::SeqCst), 2);
	}

	#[tokio::test]
	async fn closure_provider_surfaces_failures() {
		let provider = from_fn(|| async { Err(CredentialError::unavailable("vault sealed")) });
		let err = provider.password().await.expect_err("Provider failure should propagate.");

		assert_eq!(err.to_string(), "Credentials are unavailable: vault sealed.");
	}
}
