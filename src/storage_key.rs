use anyhow::{anyhow, Result};
use std::path::{Component, Path};

/// The `{group}/{name}` pair taken from the last two segments of a lambda
/// source directory, e.g. `lambda/tg-webhook`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactKey {
    pub group: String,
    pub name: String,
}

impl ArtifactKey {
    pub fn from_path(path: &Path) -> Result<Self> {
        // `..` is resolved lexically
        let mut segments: Vec<String> = vec![];
        for component in path.components() {
            match component {
                Component::Normal(segment) => segments.push(segment.to_string_lossy().into_owned()),
                Component::ParentDir => {
                    segments.pop();
                }
                _ => {}
            }
        }

        match segments.as_slice() {
            [.., group, name] => Ok(ArtifactKey {
                group: group.clone(),
                name: name.clone(),
            }),
            _ => Err(anyhow!(
                "{} should have at least two segments, e.g. lambda/tg-webhook",
                path.display()
            )),
        }
    }

    /// `{group}/{name}.zip` or `{group}/{name}.v{version}.zip`
    pub fn key(&self, version: Option<&str>) -> String {
        match version.filter(|v| !v.is_empty()) {
            Some(version) => format!("{}/{}.v{}.zip", self.group, self.name, version),
            None => format!("{}/{}.zip", self.group, self.name),
        }
    }

    pub fn backup_key(&self) -> String {
        format!("{}/{}.prev.zip", self.group, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn versioned_key() {
        let key = ArtifactKey::from_path(Path::new("lambda/tg-webhook")).unwrap();

        assert_eq!(key.key(Some("1.0.1")), "lambda/tg-webhook.v1.0.1.zip");
        assert_eq!(key.backup_key(), "lambda/tg-webhook.prev.zip");
    }

    #[test]
    fn unversioned_key() {
        let key = ArtifactKey::from_path(Path::new("lambda/tg-webhook")).unwrap();

        assert_eq!(key.key(None), "lambda/tg-webhook.zip");
        assert_eq!(key.key(Some("")), "lambda/tg-webhook.zip");
    }

    #[test]
    fn uses_last_two_segments() {
        let key = ArtifactKey::from_path(Path::new("/home/ci/./repo/lambda/wsconn/")).unwrap();

        assert_eq!(key.group, "lambda");
        assert_eq!(key.name, "wsconn");
    }

    #[test]
    fn resolves_parent_dir() {
        let key = ArtifactKey::from_path(Path::new("lambda/tg-webhook/../wsconn")).unwrap();

        assert_eq!(key.key(Some("1.0.1")), "lambda/wsconn.v1.0.1.zip");
        assert_eq!(key.backup_key(), "lambda/wsconn.prev.zip");
    }

    #[test]
    fn parent_dir_can_leave_too_few_segments() {
        assert!(ArtifactKey::from_path(Path::new("lambda/tg-webhook/../..")).is_err());
    }

    #[test]
    fn rejects_single_segment() {
        assert!(ArtifactKey::from_path(Path::new("tg-webhook")).is_err());
        assert!(ArtifactKey::from_path(Path::new("/")).is_err());
    }
}
