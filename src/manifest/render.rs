//! Canonical re-serialization of a manifest
//!
//! Emits only what the parser reads: plugins, project coordinates,
//! repositories and module dependencies. Parsing the output yields the same
//! coordinates in the same order.

use super::{Dialect, Manifest, Plugin, Repository, RepositoryKind};

const INDENT: &str = "    ";

/// Render `manifest` as a build script in the given dialect
pub fn render(manifest: &Manifest, dialect: Dialect) -> String {
    let mut sections: Vec<Vec<String>> = Vec::new();

    if !manifest.plugins().is_empty() {
        let body = manifest
            .plugins()
            .iter()
            .map(|p| render_plugin(p, dialect))
            .collect();
        sections.push(block("plugins", body));
    }

    let mut coordinates = Vec::new();
    if let Some(group) = manifest.group() {
        coordinates.push(format!("group = {}", quote(group, dialect)));
    }
    if let Some(version) = manifest.version() {
        coordinates.push(format!("version = {}", quote(version, dialect)));
    }
    if !coordinates.is_empty() {
        sections.push(coordinates);
    }

    if !manifest.repositories().is_empty() {
        let body = manifest
            .repositories()
            .iter()
            .flat_map(|r| render_repository(r, dialect))
            .collect();
        sections.push(block("repositories", body));
    }

    if !manifest.dependencies().is_empty() {
        let body = manifest
            .dependencies()
            .iter()
            .map(|d| {
                let notation = quote(&d.coordinate.to_string(), dialect);
                match dialect {
                    Dialect::Kotlin => format!("{}({})", d.configuration, notation),
                    Dialect::Groovy => format!("{} {}", d.configuration, notation),
                }
            })
            .collect();
        sections.push(block("dependencies", body));
    }

    let mut out = sections
        .into_iter()
        .map(|lines| lines.join("\n"))
        .collect::<Vec<_>>()
        .join("\n\n");
    out.push('\n');
    out
}

fn block(header: &str, body: Vec<String>) -> Vec<String> {
    let mut lines = Vec::with_capacity(body.len() + 2);
    lines.push(format!("{} {{", header));
    lines.extend(body.into_iter().map(|line| format!("{}{}", INDENT, line)));
    lines.push("}".to_string());
    lines
}

fn render_plugin(plugin: &Plugin, dialect: Dialect) -> String {
    let mut line = match dialect {
        Dialect::Kotlin if is_identifier(&plugin.id) => plugin.id.clone(),
        Dialect::Kotlin if !plugin.id.contains('.') => format!("`{}`", plugin.id),
        Dialect::Kotlin => format!("id({})", quote(&plugin.id, dialect)),
        Dialect::Groovy => format!("id {}", quote(&plugin.id, dialect)),
    };

    if let Some(ref version) = plugin.version {
        line.push_str(&format!(" version {}", quote(version, dialect)));
    }
    if !plugin.apply {
        line.push_str(" apply false");
    }
    line
}

fn render_repository(repository: &Repository, dialect: Dialect) -> Vec<String> {
    match repository.kind {
        RepositoryKind::MavenCentral => vec!["mavenCentral()".to_string()],
        RepositoryKind::Google => vec!["google()".to_string()],
        RepositoryKind::GradlePluginPortal => vec!["gradlePluginPortal()".to_string()],
        RepositoryKind::MavenLocal => vec!["mavenLocal()".to_string()],
        RepositoryKind::Maven => {
            let url = match dialect {
                Dialect::Kotlin => format!("url = uri({})", quote(&repository.url, dialect)),
                Dialect::Groovy => format!("url = {}", quote(&repository.url, dialect)),
            };
            block(
                "maven",
                vec![
                    format!("name = {}", quote(&repository.name, dialect)),
                    url,
                ],
            )
        }
    }
}

/// Quote a string the way the dialect writes literals, escaping what re-parsing would interpret
fn quote(value: &str, dialect: Dialect) -> String {
    let (quote, specials): (char, &[char]) = match dialect {
        Dialect::Kotlin => ('"', &['"', '\\', '$']),
        Dialect::Groovy => ('\'', &['\'', '\\']),
    };

    let mut out = String::with_capacity(value.len() + 2);
    out.push(quote);
    for c in value.chars() {
        match c {
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if specials.contains(&c) => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
