//! Gradle build script parser
//!
//! Walks the token stream from the lexer with a block stack. Only the
//! top-level `plugins`, `repositories` and `dependencies` blocks are read;
//! every other block is skipped together with whatever it nests.

use super::lexer::{self, read_literal, split_args, split_ident, split_parens, Token};
use super::{Dependency, Manifest, Plugin, Repository};
use crate::coordinate::Coordinate;
use crate::{ResolverError, Result};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info, trace};

/// Dependency configurations every Gradle JVM build understands
pub const STANDARD_CONFIGURATIONS: &[&str] = &[
    "api",
    "implementation",
    "compileOnly",
    "compileOnlyApi",
    "runtimeOnly",
    "testImplementation",
    "testCompileOnly",
    "testRuntimeOnly",
    "annotationProcessor",
    "testAnnotationProcessor",
    "kapt",
    "ksp",
    "classpath",
    "developmentOnly",
];

const KOTLIN_GROUP: &str = "org.jetbrains.kotlin";

/// Notations that refer to local files or projects rather than repository modules
const LOCAL_NOTATIONS: &[&str] = &[
    "project",
    "files",
    "fileTree",
    "gradleApi",
    "localGroovy",
    "gradleTestKit",
];

/// Options that change what the parser accepts
#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    /// Custom configurations accepted in `dependencies { }` besides the standard ones
    pub extra_configurations: Vec<String>,
}

impl ParseOptions {
    pub fn is_known_configuration(&self, name: &str) -> bool {
        STANDARD_CONFIGURATIONS.contains(&name)
            || self.extra_configurations.iter().any(|c| c == name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Block {
    Plugins,
    Repositories,
    Maven,
    Dependencies,
    Skipped,
}

#[derive(Debug)]
struct Frame {
    block: Block,
    header: String,
    line: usize,
}

/// Settings collected inside a `maven { }` block
#[derive(Debug, Default)]
struct PendingMaven {
    name: Option<String>,
    url: Option<String>,
}

struct Parser<'a> {
    options: &'a ParseOptions,
    manifest: Manifest,
    vars: HashMap<String, String>,
    stack: Vec<Frame>,
    pending_maven: Option<PendingMaven>,
    unnamed_maven: usize,
}

impl Manifest {
    /// Parse a manifest from build script text
    pub fn parse(text: &str) -> Result<Self> {
        Self::parse_with(text, &ParseOptions::default())
    }

    /// Parse a manifest, accepting the configurations named in `options`
    pub fn parse_with(text: &str, options: &ParseOptions) -> Result<Self> {
        let tokens = lexer::tokenize(text)?;
        trace!(tokens = tokens.len(), "Tokenized build script");

        let mut parser = Parser::new(options);
        for token in tokens {
            parser.token(token)?;
        }
        parser.finish()
    }

    /// Parse a manifest from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        Self::from_file_with(path, &ParseOptions::default())
    }

    pub fn from_file_with(path: &Path, options: &ParseOptions) -> Result<Self> {
        debug!(path = %path.display(), "Reading manifest");
        let content = std::fs::read_to_string(path)
            .map_err(|e| std::io::Error::new(e.kind(), format!("{}: {}", path.display(), e)))?;
        Self::parse_with(&content, options)
    }
}

impl<'a> Parser<'a> {
    fn new(options: &'a ParseOptions) -> Self {
        Self {
            options,
            manifest: Manifest::default(),
            vars: HashMap::new(),
            stack: Vec::new(),
            pending_maven: None,
            unnamed_maven: 0,
        }
    }

    fn token(&mut self, token: Token) -> Result<()> {
        match token {
            Token::Open { header, line } => self.open(header, line),
            Token::Stmt { text, line } => self.statement(&text, line),
            Token::Close { line } => self.close(line),
        }
    }

    fn finish(self) -> Result<Manifest> {
        if let Some(frame) = self.stack.last() {
            return Err(ResolverError::parse(
                frame.line,
                format!("{} {{", frame.header),
                "block is never closed",
            ));
        }

        info!(
            plugins = self.manifest.plugins.len(),
            repositories = self.manifest.repositories.len(),
            dependencies = self.manifest.dependencies.len(),
            "Parsed manifest"
        );
        Ok(self.manifest)
    }

    fn open(&mut self, header: String, line: usize) -> Result<()> {
        let parent = self.stack.last().map(|f| f.block);
        let block = match parent {
            None => match header.as_str() {
                "plugins" => Block::Plugins,
                "repositories" => Block::Repositories,
                "dependencies" => Block::Dependencies,
                _ => {
                    trace!(header = %header, line, "Skipping block");
                    Block::Skipped
                }
            },
            Some(Block::Skipped) | Some(Block::Maven) => Block::Skipped,
            Some(Block::Plugins) => {
                return Err(ResolverError::parse(
                    line,
                    format!("{} {{", header),
                    "unexpected block inside plugins",
                ))
            }
            Some(Block::Repositories) if header == "maven" => {
                self.pending_maven = Some(PendingMaven::default());
                Block::Maven
            }
            Some(Block::Repositories) => {
                // `mavenCentral { content { … } }`, `maven("url") { … }`
                self.repository(&header, line)?;
                Block::Skipped
            }
            Some(Block::Dependencies) if header == "constraints" => Block::Skipped,
            Some(Block::Dependencies) => {
                // `implementation("g:a:v") { exclude(…) }`
                self.dependency(&header, line)?;
                Block::Skipped
            }
        };

        self.stack.push(Frame {
            block,
            header,
            line,
        });
        Ok(())
    }

    fn close(&mut self, line: usize) -> Result<()> {
        let frame = self
            .stack
            .pop()
            .ok_or_else(|| ResolverError::parse(line, "}", "unexpected '}' without matching '{'"))?;

        if frame.block == Block::Maven {
            let pending = self.pending_maven.take().unwrap_or_default();
            let url = pending.url.ok_or_else(|| {
                ResolverError::parse(frame.line, "maven {", "maven repository declares no url")
            })?;
            let name = match pending.name {
                Some(name) => name,
                None => self.next_maven_name(),
            };
            self.push_repository(Repository::maven(name, url));
        }

        Ok(())
    }

    fn statement(&mut self, text: &str, line: usize) -> Result<()> {
        match self.stack.last().map(|f| f.block) {
            None => {
                self.top_level(text);
                Ok(())
            }
            Some(Block::Skipped) => Ok(()),
            Some(Block::Plugins) => self.plugin(text, line),
            Some(Block::Repositories) => self.repository(text, line),
            Some(Block::Maven) => self.maven_setting(text, line),
            Some(Block::Dependencies) => self.dependency(text, line),
        }
    }

    /// `group = …`, `version = …` and string variables; everything else is ignored
    fn top_level(&mut self, text: &str) {
        let Some((ident, rest)) = split_ident(text) else {
            return;
        };

        match ident {
            "group" | "version" => {
                if let Some(value) = self.assigned_string(rest) {
                    trace!(property = ident, value = %value, "Project property");
                    self.vars.insert(ident.to_string(), value.clone());
                    if ident == "group" {
                        self.manifest.group = Some(value);
                    } else {
                        self.manifest.version = Some(value);
                    }
                }
            }
            "val" | "var" | "def" => {
                if let Some((name, rest)) = split_ident(rest) {
                    // drop a Kotlin type annotation: `val v: String = "1.0"`
                    let rest = match rest.find('=') {
                        Some(eq) if rest.trim_start().starts_with(':') => &rest[eq..],
                        _ => rest,
                    };
                    if let Some(value) = self.assigned_string(rest) {
                        trace!(name, value = %value, "String variable");
                        self.vars.insert(name.to_string(), value);
                    }
                }
            }
            "ext" => {
                if let Some((name, rest)) = rest.strip_prefix('.').and_then(split_ident) {
                    if let Some(value) = self.assigned_string(rest) {
                        self.vars.insert(name.to_string(), value);
                    }
                }
            }
            _ => trace!(statement = text, "Ignoring top-level statement"),
        }
    }

    fn plugin(&mut self, text: &str, line: usize) -> Result<()> {
        let err = |reason: &str| ResolverError::parse(line, text, reason);

        let (id, rest) = if let Some(quoted) = text.strip_prefix('`') {
            let end = quoted
                .find('`')
                .ok_or_else(|| err("unterminated back-ticked plugin id"))?;
            (quoted[..end].to_string(), &quoted[end + 1..])
        } else {
            let (ident, rest) =
                split_ident(text).ok_or_else(|| err("unsupported plugin declaration"))?;
            match ident {
                "id" => self
                    .call_string(rest)
                    .ok_or_else(|| err("expected a plugin id string"))?,
                "kotlin" => {
                    let (name, rest) = self
                        .call_string(rest)
                        .ok_or_else(|| err("expected a Kotlin plugin name string"))?;
                    (format!("{}.{}", KOTLIN_GROUP, name), rest)
                }
                _ => (ident.to_string(), rest),
            }
        };

        let (version, apply) = self
            .plugin_suffix(rest)
            .ok_or_else(|| err("unsupported plugin declaration"))?;

        debug!(id = %id, version = ?version, "Plugin declared");
        self.manifest.plugins.push(Plugin { id, version, apply });
        Ok(())
    }

    /// Parse `version "v"`, `.version("v")`, `apply false` after a plugin id
    fn plugin_suffix(&self, rest: &str) -> Option<(Option<String>, bool)> {
        let mut rest = rest.trim();
        let mut version = None;
        let mut apply = true;

        while !rest.is_empty() {
            rest = rest.trim_start_matches('.').trim_start();
            let (word, after) = split_ident(rest)?;
            match word {
                "version" => {
                    let (value, after) = self.call_string(after)?;
                    version = Some(value);
                    rest = after.trim();
                }
                "apply" => {
                    let after = after.trim();
                    let (flag, after) = match split_parens(after) {
                        Some((inner, a)) => (inner.trim(), a),
                        None => split_ident(after)?,
                    };
                    apply = match flag {
                        "true" => true,
                        "false" => false,
                        _ => return None,
                    };
                    rest = after.trim();
                }
                _ => return None,
            }
        }

        Some((version, apply))
    }

    fn repository(&mut self, text: &str, line: usize) -> Result<()> {
        let err = |reason: &str| ResolverError::parse(line, text, reason);

        let (ident, rest) =
            split_ident(text).ok_or_else(|| err("unsupported repository declaration"))?;
        let rest = rest.trim();
        let args = if rest.is_empty() {
            ""
        } else {
            let (inner, after) =
                split_parens(rest).ok_or_else(|| err("unsupported repository declaration"))?;
            if !after.trim().is_empty() {
                return Err(err("unexpected text after repository declaration"));
            }
            inner.trim()
        };

        let repository = match (ident, args.is_empty()) {
            ("mavenCentral", true) => Repository::maven_central(),
            ("google", true) => Repository::google(),
            ("gradlePluginPortal", true) => Repository::gradle_plugin_portal(),
            ("mavenLocal", true) => Repository::maven_local(),
            ("maven", false) => {
                let mut name = None;
                let mut url = None;
                for arg in split_args(args) {
                    match self.named_argument(arg) {
                        Some(("url", value)) => url = self.string_value(value),
                        Some(("name", value)) => name = self.string_value(value),
                        Some(_) => return Err(err("unsupported maven repository argument")),
                        None => url = self.string_value(arg),
                    }
                }
                let url = url.ok_or_else(|| err("expected a repository url string"))?;
                let url = validate_url(&url).map_err(|reason| err(reason.as_str()))?;
                let name = match name {
                    Some(name) => name,
                    None => self.next_maven_name(),
                };
                Repository::maven(name, url)
            }
            _ => return Err(err("unsupported repository declaration")),
        };

        self.push_repository(repository);
        Ok(())
    }

    /// A statement inside `maven { }`: `url = uri("…")`, `url "…"`, `setUrl("…")`, `name = "…"`
    fn maven_setting(&mut self, text: &str, line: usize) -> Result<()> {
        let err = |reason: &str| ResolverError::parse(line, text, reason);

        let Some((ident, rest)) = split_ident(text) else {
            return Ok(());
        };
        let rest = rest.trim();
        let value_text = rest.strip_prefix('=').unwrap_or(rest);

        match ident {
            "url" | "setUrl" => {
                let url = self
                    .string_value(value_text)
                    .ok_or_else(|| err("expected a repository url string"))?;
                let url = validate_url(&url).map_err(|reason| err(reason.as_str()))?;
                if let Some(pending) = self.pending_maven.as_mut() {
                    pending.url = Some(url);
                }
            }
            "name" | "setName" => {
                let name = self
                    .string_value(value_text)
                    .ok_or_else(|| err("expected a repository name string"))?;
                if let Some(pending) = self.pending_maven.as_mut() {
                    pending.name = Some(name);
                }
            }
            _ => trace!(statement = text, "Ignoring maven repository setting"),
        }

        Ok(())
    }

    fn dependency(&mut self, text: &str, line: usize) -> Result<()> {
        let err = |reason: String| ResolverError::parse(line, text, reason);

        let (configuration, rest) = split_ident(text)
            .ok_or_else(|| err("unsupported dependency declaration".to_string()))?;
        if !self.options.is_known_configuration(configuration) {
            return Err(err(format!(
                "unknown dependency configuration '{}'",
                configuration
            )));
        }

        let rest = rest.trim();
        let notation = if rest.starts_with('(') {
            let (inner, after) = split_parens(rest)
                .ok_or_else(|| err("unbalanced parentheses".to_string()))?;
            if !after.trim().is_empty() {
                return Err(err("unexpected text after dependency notation".to_string()));
            }
            inner.trim()
        } else {
            rest
        };

        if notation.is_empty() {
            return Err(err("missing dependency notation".to_string()));
        }

        match self.notation(notation).map_err(err)? {
            Some(coordinate) => {
                debug!(configuration, coordinate = %coordinate, line, "Dependency declared");
                self.manifest
                    .dependencies
                    .push(Dependency::new(configuration, coordinate, line));
            }
            None => debug!(configuration, notation, line, "Skipping local dependency"),
        }

        Ok(())
    }

    /// Turn a dependency notation into a coordinate; `None` for local notations
    fn notation(&self, notation: &str) -> std::result::Result<Option<Coordinate>, String> {
        let notation = notation.trim();

        if notation.starts_with('"') || notation.starts_with('\'') {
            if split_args(notation).len() != 1 {
                return Err("expected a single dependency notation".to_string());
            }
            let (literal, rest) = read_literal(notation, &self.vars)
                .ok_or_else(|| "unterminated string literal".to_string())?;
            if !rest.trim().is_empty() {
                return Err("unexpected text after dependency notation".to_string());
            }
            return literal
                .value
                .parse::<Coordinate>()
                .map(Some)
                .map_err(|e| format!("malformed coordinate '{}': {}", literal.value, e));
        }

        if let Some((ident, rest)) = split_ident(notation) {
            match ident {
                "platform" | "enforcedPlatform" | "testFixtures" => {
                    let (inner, after) = split_parens(rest)
                        .ok_or_else(|| format!("expected {}(…)", ident))?;
                    if !after.trim().is_empty() {
                        return Err("unexpected text after dependency notation".to_string());
                    }
                    return self.notation(inner);
                }
                "kotlin" => return self.kotlin_module(rest).map(Some),
                "group" | "name" | "version" => {
                    let rest = rest.trim_start();
                    if rest.starts_with(':') || rest.starts_with('=') {
                        return self.map_notation(notation).map(Some);
                    }
                }
                _ if LOCAL_NOTATIONS.contains(&ident) => return Ok(None),
                _ => {}
            }
        }

        Err(format!("unsupported dependency notation '{}'", notation))
    }

    /// `group: 'g', name: 'a', version: 'v'` or `group = "g", name = "a", version = "v"`
    fn map_notation(&self, notation: &str) -> std::result::Result<Coordinate, String> {
        let mut group = None;
        let mut name = None;
        let mut version = None;

        for arg in split_args(notation) {
            let (key, value) = self
                .named_argument(arg)
                .ok_or_else(|| format!("expected key: value, found '{}'", arg))?;
            let value = self
                .string_value(value)
                .ok_or_else(|| format!("expected a string for '{}'", key))?;
            match key {
                "group" => group = Some(value),
                "name" => name = Some(value),
                "version" => version = Some(value),
                other => return Err(format!("unsupported dependency attribute '{}'", other)),
            }
        }

        let group = group.ok_or("dependency is missing 'group'")?;
        let name = name.ok_or("dependency is missing 'name'")?;
        let version = version.ok_or("dependency is missing 'version'")?;

        format!("{}:{}:{}", group, name, version)
            .parse::<Coordinate>()
            .map_err(|e| format!("malformed coordinate: {}", e))
    }

    /// `kotlin("stdlib")` or `kotlin("stdlib", "1.9.0")`
    fn kotlin_module(&self, rest: &str) -> std::result::Result<Coordinate, String> {
        let (inner, after) =
            split_parens(rest).ok_or_else(|| "expected kotlin(\"module\")".to_string())?;
        if !after.trim().is_empty() {
            return Err("unexpected text after dependency notation".to_string());
        }

        let args = split_args(inner);
        let module = args
            .first()
            .and_then(|a| self.string_value(a))
            .ok_or_else(|| "expected kotlin(\"module\")".to_string())?;

        let version = match args.get(1) {
            Some(arg) => self
                .string_value(arg)
                .ok_or_else(|| "expected a Kotlin version string".to_string())?,
            None => self
                .manifest
                .plugins
                .iter()
                .filter(|p| p.id.starts_with(KOTLIN_GROUP))
                .find_map(|p| p.version.clone())
                .ok_or_else(|| {
                    format!(
                        "kotlin(\"{}\") has no version and no versioned Kotlin plugin is applied",
                        module
                    )
                })?,
        };

        Ok(Coordinate::new(
            KOTLIN_GROUP,
            format!("kotlin-{}", module),
            version,
        ))
    }

    /// Split `key = value` or `key: value`
    fn named_argument<'s>(&self, arg: &'s str) -> Option<(&'s str, &'s str)> {
        let (key, rest) = split_ident(arg)?;
        let rest = rest.trim_start();
        let value = rest.strip_prefix(':').or_else(|| rest.strip_prefix('='))?;
        Some((key, value.trim()))
    }

    /// A string literal, optionally wrapped in `uri(…)` or parentheses
    fn string_value(&self, s: &str) -> Option<String> {
        let s = s.trim();

        if s.starts_with('(') {
            let (inner, after) = split_parens(s)?;
            return if after.trim().is_empty() {
                self.string_value(inner)
            } else {
                None
            };
        }

        for wrapper in ["uri", "java.net.URI", "URI.create", "URI"] {
            if let Some(rest) = s.strip_prefix(wrapper) {
                let rest = rest.trim_start();
                if rest.starts_with('(') {
                    return self.string_value(rest);
                }
                if rest.starts_with('"') || rest.starts_with('\'') {
                    return self.string_value(rest);
                }
            }
        }

        let (literal, rest) = read_literal(s, &self.vars)?;
        rest.trim().is_empty().then_some(literal.value)
    }

    /// `("x") rest` or ` "x" rest`
    fn call_string<'s>(&self, rest: &'s str) -> Option<(String, &'s str)> {
        let rest = rest.trim_start();
        if rest.starts_with('(') {
            let (inner, after) = split_parens(rest)?;
            Some((self.string_value(inner)?, after))
        } else {
            let (literal, after) = read_literal(rest, &self.vars)?;
            Some((literal.value, after))
        }
    }

    /// `= "value"` or ` 'value'` for simple assignments
    fn assigned_string(&self, rest: &str) -> Option<String> {
        let rest = rest.trim();
        let rest = rest.strip_prefix('=').unwrap_or(rest);
        let (literal, after) = read_literal(rest, &self.vars)?;
        after.trim().is_empty().then_some(literal.value)
    }

    fn next_maven_name(&mut self) -> String {
        self.unnamed_maven += 1;
        if self.unnamed_maven == 1 {
            "maven".to_string()
        } else {
            format!("maven{}", self.unnamed_maven)
        }
    }

    fn push_repository(&mut self, repository: Repository) {
        debug!(name = %repository.name, url = %repository.url, "Repository declared");
        self.manifest.repositories.push(repository);
    }
}

fn validate_url(raw: &str) -> std::result::Result<String, String> {
    url::Url::parse(raw)
        .map(|_| raw.to_string())
        .map_err(|e| format!("invalid repository url '{}': {}", raw, e))
}
