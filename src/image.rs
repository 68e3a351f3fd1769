// (C) Copyright 2019-2020 Hewlett Packard Enterprise Development LP

use std::fmt;

/// A parsed Docker image reference.
///
/// The `Display` impl may be used to convert a parsed reference back to a
/// plain string:
/// ```
/// use docker_lint::ImageRef;
///
/// let image = ImageRef::parse("alpine:3.18");
/// assert_eq!(image.image, "alpine");
/// assert_eq!(image.tag, Some("3.18".to_string()));
/// assert_eq!(format!("{}", image), "alpine:3.18");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
  /// The image name as written, possibly including a registry or
  /// organization prefix.
  pub image: String,

  /// An optional image tag (after the colon, e.g. `:1.2.3`), generally
  /// inferred to mean `:latest` if unset.
  pub tag: Option<String>,

  /// An optional embedded digest, e.g. `sha256:...`. Conflicts with `tag`.
  pub digest: Option<String>
}

impl ImageRef {
  /// Parses an `ImageRef` from a string.
  ///
  /// The reference is split on `@` first (digest), then the leading part
  /// on its first `:` (tag). This is not fallible; malformed references
  /// produce unexpected but harmless results.
  pub fn parse(s: &str) -> ImageRef {
    if let Some(at) = s.find('@') {
      return ImageRef {
        image: s[..at].to_string(),
        tag: None,
        digest: Some(s[at + 1..].to_string())
      };
    }

    match s.find(':') {
      Some(colon) => ImageRef {
        image: s[..colon].to_string(),
        tag: Some(s[colon + 1..].to_string()),
        digest: None
      },
      None => ImageRef {
        image: s.to_string(),
        tag: None,
        digest: None
      }
    }
  }

  /// The bare image name with any registry or organization path prefix
  /// stripped, lowercased: `gcr.io/project/Ubuntu` becomes `ubuntu`.
  pub fn base_name(&self) -> String {
    base_name(&self.image)
  }
}

/// Strips the registry/path prefix from an image name and lowercases it.
pub(crate) fn base_name(image: &str) -> String {
  image
    .rsplit('/')
    .next()
    .unwrap_or(image)
    .to_ascii_lowercase()
}

impl fmt::Display for ImageRef {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.image)?;

    if let Some(tag) = &self.tag {
      write!(f, ":{}", tag)?;
    } else if let Some(digest) = &self.digest {
      write!(f, "@{}", digest)?;
    }

    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use super::*;

  #[test]
  fn test_image_parse_plain() {
    assert_eq!(
      ImageRef::parse("alpine"),
      ImageRef {
        image: "alpine".into(),
        tag: None,
        digest: None
      }
    );
  }

  #[test]
  fn test_image_parse_tag() {
    assert_eq!(
      ImageRef::parse("alpine:3.18"),
      ImageRef {
        image: "alpine".into(),
        tag: Some("3.18".into()),
        digest: None
      }
    );

    assert_eq!(
      ImageRef::parse("clux/muslrust:1.41.0-stable"),
      ImageRef {
        image: "clux/muslrust".into(),
        tag: Some("1.41.0-stable".into()),
        digest: None
      }
    );
  }

  #[test]
  fn test_image_parse_digest() {
    assert_eq!(
      ImageRef::parse("alpine@sha256:abc123"),
      ImageRef {
        image: "alpine".into(),
        tag: None,
        digest: Some("sha256:abc123".into())
      }
    );

    // the digest wins over any colon in the leading part
    assert_eq!(
      ImageRef::parse("alpine:3.18@sha256:abc123"),
      ImageRef {
        image: "alpine:3.18".into(),
        tag: None,
        digest: Some("sha256:abc123".into())
      }
    );
  }

  #[test]
  fn test_image_parse_empty_tag() {
    assert_eq!(
      ImageRef::parse("alpine:"),
      ImageRef {
        image: "alpine".into(),
        tag: Some("".into()),
        digest: None
      }
    );
  }

  #[test]
  fn test_base_name() {
    assert_eq!(base_name("ubuntu"), "ubuntu");
    assert_eq!(base_name("library/Ubuntu"), "ubuntu");
    assert_eq!(base_name("gcr.io/project/node"), "node");
  }

  #[test]
  fn test_display_round_trip() {
    for s in ["alpine", "alpine:3.18", "gcr.io/project/node:18", "alpine@sha256:abc"] {
      assert_eq!(format!("{}", ImageRef::parse(s)), s);
    }
  }
}
