//! Registry of documentation sites served by the assistant.
//!
//! Known projects map an assistant id to a display name and the domain the
//! docs are hosted on. The domain matters because the upstream only accepts
//! requests whose `Origin` matches the site. Ids missing from the registry
//! still work: their domain is derived from the id.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use serde::Deserialize;

/// Suffix used to derive a domain for projects missing from the registry.
pub const FALLBACK_DOMAIN_SUFFIX: &str = "mintlify.app";

/// Built-in projects: `(id, name, domain)`.
const BUILTIN_PROJECTS: &[(&str, &str, &str)] = &[
    ("agno-v2", "Agno", "docs.agno.com"),
    ("browserbase", "Browserbase", "docs.browserbase.com"),
    ("cursor", "Cursor", "docs.cursor.com"),
    ("mintlify", "Mintlify", "mintlify.com"),
    ("pinecone", "Pinecone", "docs.pinecone.io"),
    ("resend", "Resend", "resend.com"),
    ("trigger", "Trigger.dev", "trigger.dev"),
];

/// A documentation site known to the bridge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnownProject {
    /// Assistant id used in the upstream URL and request body.
    pub id: String,
    /// Human readable name.
    pub name: String,
    /// Host the docs are served from, without scheme.
    pub domain: String,
}

impl KnownProject {
    /// Project entry derived for an id that is not in the registry.
    #[must_use]
    pub fn fallback(id: &str) -> Self {
        Self {
            id: id.to_string(),
            name: id.to_string(),
            domain: format!("{id}.{FALLBACK_DOMAIN_SUFFIX}"),
        }
    }

    /// `https://{domain}`, sent as the `Origin` header.
    #[must_use]
    pub fn origin(&self) -> String {
        format!("https://{}", self.domain)
    }

    /// `https://{domain}/`, sent as the `Referer` header.
    #[must_use]
    pub fn referer(&self) -> String {
        format!("https://{}/", self.domain)
    }
}

/// Extra registry entry supplied through configuration.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ProjectEntry {
    /// Display name; defaults to the project id.
    #[serde(default)]
    pub name: Option<String>,
    /// Docs host, e.g. `docs.example.com`.
    pub domain: String,
}

/// Lookup table from project id to [`KnownProject`].
#[derive(Debug, Clone)]
pub struct ProjectRegistry {
    projects: BTreeMap<String, KnownProject>,
}

impl Default for ProjectRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ProjectRegistry {
    /// Registry holding only the built-in projects.
    #[must_use]
    pub fn builtin() -> Self {
        let projects = BUILTIN_PROJECTS
            .iter()
            .map(|(id, name, domain)| {
                (
                    (*id).to_string(),
                    KnownProject {
                        id: (*id).to_string(),
                        name: (*name).to_string(),
                        domain: (*domain).to_string(),
                    },
                )
            })
            .collect();
        Self { projects }
    }

    /// Add configured entries on top of the built-ins, replacing any with
    /// the same id.
    #[must_use]
    pub fn with_entries<'a, I>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = (&'a String, &'a ProjectEntry)>,
    {
        for (id, entry) in entries {
            let domain = entry
                .domain
                .trim()
                .trim_start_matches("https://")
                .trim_start_matches("http://")
                .trim_end_matches('/')
                .to_string();
            self.projects.insert(
                id.clone(),
                KnownProject {
                    id: id.clone(),
                    name: entry.name.clone().unwrap_or_else(|| id.clone()),
                    domain,
                },
            );
        }
        self
    }

    /// Look up a registered project.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&KnownProject> {
        self.projects.get(id)
    }

    /// Look up a project, deriving a fallback entry for unknown ids.
    #[must_use]
    pub fn resolve(&self, id: &str) -> KnownProject {
        self.get(id)
            .cloned()
            .unwrap_or_else(|| KnownProject::fallback(id))
    }

    /// Registered projects ordered by id.
    pub fn iter(&self) -> impl Iterator<Item = &KnownProject> {
        self.projects.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.projects.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    /// Markdown list of the registered projects, as returned by `list_docs`.
    #[must_use]
    pub fn render_list(&self) -> String {
        let mut out = String::from("Available documentation projects:\n\n");
        for project in self.iter() {
            let _ = writeln!(
                out,
                "- **{}** (`{}`): https://{}",
                project.name, project.id, project.domain
            );
        }
        let _ = write!(
            out,
            "\nAny other Mintlify project id can be used as well; it is resolved as `<id>.{FALLBACK_DOMAIN_SUFFIX}`."
        );
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_builtin_lookup() {
        let registry = ProjectRegistry::builtin();
        let agno = registry.get("agno-v2").unwrap();
        assert_eq!(agno.name, "Agno");
        assert_eq!(agno.origin(), "https://docs.agno.com");
        assert_eq!(agno.referer(), "https://docs.agno.com/");
    }

    #[test]
    fn test_unknown_id_falls_back() {
        let registry = ProjectRegistry::builtin();
        assert!(registry.get("acme").is_none());

        let project = registry.resolve("acme");
        assert_eq!(project.id, "acme");
        assert_eq!(project.domain, "acme.mintlify.app");
        assert_eq!(project, registry.resolve("acme"));
    }

    #[test]
    fn test_configured_entries_override_builtins() {
        let mut extra = HashMap::new();
        extra.insert(
            "resend".to_string(),
            ProjectEntry {
                name: Some("Resend Docs".to_string()),
                domain: "https://docs.resend.dev/".to_string(),
            },
        );
        extra.insert(
            "acme".to_string(),
            ProjectEntry {
                name: None,
                domain: "docs.acme.io".to_string(),
            },
        );

        let registry = ProjectRegistry::builtin().with_entries(&extra);
        assert_eq!(registry.len(), BUILTIN_PROJECTS.len() + 1);
        assert_eq!(registry.resolve("resend").domain, "docs.resend.dev");
        assert_eq!(registry.resolve("resend").name, "Resend Docs");
        assert_eq!(registry.resolve("acme").name, "acme");
    }

    #[test]
    fn test_render_list_mentions_every_project() {
        let registry = ProjectRegistry::builtin();
        let list = registry.render_list();
        for project in registry.iter() {
            assert!(list.contains(&format!("`{}`", project.id)));
            assert!(list.contains(&project.domain));
        }
        assert!(list.contains("mintlify.app"));
    }
}
