// [libs/domain/models/src/credential.rs]
use std::fmt;

/// Opaque bearer token for the upstream match API. Deliberately excludes
/// `Debug`/`Display` of the raw value — logs must never print it.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_never_prints_the_raw_token() {
        let cred = Credential::new("super-secret-token");
        let rendered = format!("{:?}", cred);
        assert!(!rendered.contains("super-secret-token"));
    }
}
