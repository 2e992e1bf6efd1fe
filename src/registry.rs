//! Pattern registry: one entry per build ecosystem.
//!
//! Each [`EcosystemProfile`] maps an ecosystem tag to its manifest
//! filenames, source-file extensions, endpoint-declaration patterns, and
//! outbound-call patterns. Extraction behavior varies per ecosystem by
//! registering new entries here, not by subclassing: extractors are pure
//! functions from file content to extracted sets, selected by manifest
//! presence.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// A build/dependency convention, identified by its manifest file type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ecosystem {
    /// Maven (`pom.xml`).
    Maven,
    /// Gradle (`build.gradle`, `build.gradle.kts`).
    Gradle,
    /// Node (`package.json`).
    Node,
    /// Python (`requirements.txt`, `setup.py`).
    Python,
    /// Go modules (`go.mod`).
    Go,
    /// PHP Composer (`composer.json`).
    Php,
}

impl Ecosystem {
    /// Lowercase tag used to qualify emitted dependency identifiers.
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            Self::Maven => "maven",
            Self::Gradle => "gradle",
            Self::Node => "node",
            Self::Python => "python",
            Self::Go => "go",
            Self::Php => "php",
        }
    }
}

impl fmt::Display for Ecosystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Protocol family of an outbound call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    /// HTTP client invocation.
    Http,
    /// Generated RPC stub invocation.
    Grpc,
    /// Shell-level HTTP call (`curl`, `wget`, PHP stream helpers).
    Curl,
    /// Browser/runtime fetch-style invocation.
    Fetch,
}

impl Protocol {
    /// Lowercase tag used to qualify emitted call targets.
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Grpc => "grpc",
            Self::Curl => "curl",
            Self::Fetch => "fetch",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// One endpoint-declaration pattern.
///
/// Capture group 1 is the path. `method: None` means the pattern cannot
/// determine the verb syntactically; extraction defaults it to `GET`.
pub struct EndpointPattern {
    /// HTTP verb this pattern implies, if any.
    pub method: Option<&'static str>,
    /// Regex source with the path as capture group 1.
    pub pattern: &'static str,
}

/// One outbound-call pattern.
///
/// Capture group 1, when present and matched, is the literal call target;
/// otherwise the target is recorded as `unresolved`.
pub struct CallPattern {
    /// Protocol family recorded for matches.
    pub protocol: Protocol,
    /// Regex source with an optional literal target as capture group 1.
    pub pattern: &'static str,
}

/// Registry entry for one ecosystem.
pub struct EcosystemProfile {
    /// The ecosystem this entry describes.
    pub ecosystem: Ecosystem,
    /// Manifest filenames whose presence marks the ecosystem as detected.
    pub manifests: &'static [&'static str],
    /// Source-file extensions scanned for endpoints and calls.
    pub extensions: &'static [&'static str],
    /// Endpoint-declaration patterns.
    pub endpoints: &'static [EndpointPattern],
    /// Outbound-call patterns.
    pub calls: &'static [CallPattern],
}

/// The static registry, one profile per supported ecosystem.
pub static PROFILES: &[EcosystemProfile] = &[
    EcosystemProfile {
        ecosystem: Ecosystem::Maven,
        manifests: &["pom.xml"],
        extensions: &["java", "kt"],
        endpoints: JVM_ENDPOINTS,
        calls: JVM_CALLS,
    },
    EcosystemProfile {
        ecosystem: Ecosystem::Gradle,
        manifests: &["build.gradle", "build.gradle.kts"],
        extensions: &["java", "kt"],
        endpoints: JVM_ENDPOINTS,
        calls: JVM_CALLS,
    },
    EcosystemProfile {
        ecosystem: Ecosystem::Node,
        manifests: &["package.json"],
        extensions: &["js", "ts"],
        endpoints: &[
            EndpointPattern {
                method: Some("GET"),
                pattern: r#"\b(?:app|router)\.get\(\s*["'`]([^"'`]+)["'`]"#,
            },
            EndpointPattern {
                method: Some("POST"),
                pattern: r#"\b(?:app|router)\.post\(\s*["'`]([^"'`]+)["'`]"#,
            },
            EndpointPattern {
                method: Some("PUT"),
                pattern: r#"\b(?:app|router)\.put\(\s*["'`]([^"'`]+)["'`]"#,
            },
            EndpointPattern {
                method: Some("DELETE"),
                pattern: r#"\b(?:app|router)\.delete\(\s*["'`]([^"'`]+)["'`]"#,
            },
            EndpointPattern {
                method: Some("PATCH"),
                pattern: r#"\b(?:app|router)\.patch\(\s*["'`]([^"'`]+)["'`]"#,
            },
        ],
        calls: &[
            CallPattern {
                protocol: Protocol::Http,
                pattern: r#"axios\.(?:get|post|put|delete|patch|request|create)\(\s*(?:["'`]([^"'`]+)["'`])?"#,
            },
            CallPattern {
                protocol: Protocol::Fetch,
                pattern: r#"\bfetch\(\s*(?:["'`]([^"'`]+)["'`])?"#,
            },
        ],
    },
    EcosystemProfile {
        ecosystem: Ecosystem::Python,
        manifests: &["requirements.txt", "setup.py"],
        extensions: &["py"],
        endpoints: &[
            EndpointPattern {
                method: None,
                pattern: r#"@(?:app|router|bp|blueprint)\.route\(\s*["']([^"']+)["']"#,
            },
            EndpointPattern {
                method: Some("GET"),
                pattern: r#"@(?:app|router)\.get\(\s*["']([^"']+)["']"#,
            },
            EndpointPattern {
                method: Some("POST"),
                pattern: r#"@(?:app|router)\.post\(\s*["']([^"']+)["']"#,
            },
            EndpointPattern {
                method: Some("PUT"),
                pattern: r#"@(?:app|router)\.put\(\s*["']([^"']+)["']"#,
            },
            EndpointPattern {
                method: Some("DELETE"),
                pattern: r#"@(?:app|router)\.delete\(\s*["']([^"']+)["']"#,
            },
            EndpointPattern {
                method: Some("PATCH"),
                pattern: r#"@(?:app|router)\.patch\(\s*["']([^"']+)["']"#,
            },
        ],
        calls: &[
            CallPattern {
                protocol: Protocol::Http,
                pattern: r#"requests\.(?:get|post|put|delete|head|options)\(\s*(?:["']([^"']+)["'])?"#,
            },
            CallPattern {
                protocol: Protocol::Grpc,
                pattern: r#"insecure_channel\(\s*(?:["']([^"']+)["'])?"#,
            },
        ],
    },
    EcosystemProfile {
        ecosystem: Ecosystem::Go,
        manifests: &["go.mod"],
        extensions: &["go"],
        endpoints: &[
            EndpointPattern { method: None, pattern: r#"\.HandleFunc\(\s*"([^"]+)""# },
            EndpointPattern { method: Some("GET"), pattern: r#"\.GET\(\s*"([^"]+)""# },
            EndpointPattern { method: Some("POST"), pattern: r#"\.POST\(\s*"([^"]+)""# },
            EndpointPattern { method: Some("PUT"), pattern: r#"\.PUT\(\s*"([^"]+)""# },
            EndpointPattern { method: Some("DELETE"), pattern: r#"\.DELETE\(\s*"([^"]+)""# },
        ],
        calls: &[CallPattern {
            protocol: Protocol::Http,
            pattern: r#"\bhttp\.(?:Get|Post|Head|PostForm)\(\s*(?:"([^"]+)")?"#,
        }],
    },
    EcosystemProfile {
        ecosystem: Ecosystem::Php,
        manifests: &["composer.json"],
        extensions: &["php"],
        endpoints: &[
            EndpointPattern {
                method: Some("GET"),
                pattern: r#"\$\w+->get\(\s*["']([^"']+)["']"#,
            },
            EndpointPattern {
                method: Some("POST"),
                pattern: r#"\$\w+->post\(\s*["']([^"']+)["']"#,
            },
            EndpointPattern {
                method: Some("PUT"),
                pattern: r#"\$\w+->put\(\s*["']([^"']+)["']"#,
            },
            EndpointPattern {
                method: Some("DELETE"),
                pattern: r#"\$\w+->delete\(\s*["']([^"']+)["']"#,
            },
        ],
        calls: &[
            CallPattern {
                protocol: Protocol::Curl,
                pattern: r#"curl_init\(\s*(?:["']([^"']+)["'])?"#,
            },
            CallPattern {
                protocol: Protocol::Curl,
                pattern: r#"file_get_contents\(\s*(?:["']([^"']+)["'])?"#,
            },
        ],
    },
];

/// Spring and JAX-RS endpoint idioms, shared by the Maven and Gradle
/// profiles (same source languages, different build manifests).
static JVM_ENDPOINTS: &[EndpointPattern] = &[
    EndpointPattern {
        method: Some("GET"),
        pattern: r#"@GetMapping\(\s*(?:value\s*=\s*)?"([^"]+)""#,
    },
    EndpointPattern {
        method: Some("POST"),
        pattern: r#"@PostMapping\(\s*(?:value\s*=\s*)?"([^"]+)""#,
    },
    EndpointPattern {
        method: Some("PUT"),
        pattern: r#"@PutMapping\(\s*(?:value\s*=\s*)?"([^"]+)""#,
    },
    EndpointPattern {
        method: Some("DELETE"),
        pattern: r#"@DeleteMapping\(\s*(?:value\s*=\s*)?"([^"]+)""#,
    },
    EndpointPattern {
        method: Some("PATCH"),
        pattern: r#"@PatchMapping\(\s*(?:value\s*=\s*)?"([^"]+)""#,
    },
    EndpointPattern {
        method: None,
        pattern: r#"@RequestMapping\(\s*(?:value\s*=\s*)?"([^"]+)""#,
    },
    EndpointPattern { method: None, pattern: r#"@Path\(\s*"([^"]+)""# },
];

/// HTTP client and RPC stub idioms for JVM sources.
static JVM_CALLS: &[CallPattern] = &[
    CallPattern {
        protocol: Protocol::Http,
        pattern: r#"(?i)restTemplate\.(?:getForObject|getForEntity|postForObject|postForEntity|exchange)\(\s*(?:"([^"]+)")?"#,
    },
    CallPattern {
        protocol: Protocol::Http,
        pattern: r#"WebClient\s*\.\s*create\(\s*(?:"([^"]+)")?"#,
    },
    CallPattern {
        protocol: Protocol::Http,
        pattern: r#"(?i)webClient\.(?:get|post|put|delete|method)\("#,
    },
    CallPattern {
        protocol: Protocol::Http,
        pattern: r#"(?i)httpClient\.(?:send|execute)\("#,
    },
    CallPattern { protocol: Protocol::Grpc, pattern: r"\.newBlockingStub\(" },
    CallPattern { protocol: Protocol::Grpc, pattern: r"(?i)grpc\w*stub\b" },
];

/// Call idioms applied to every candidate source file regardless of
/// ecosystem: bare URL literals, shell-level HTTP tools, and quoted
/// `/api/...` path literals.
pub static COMMON_CALLS: &[CallPattern] = &[
    CallPattern { protocol: Protocol::Http, pattern: r#"(https?://[^\s"'`<>]+)"# },
    CallPattern {
        protocol: Protocol::Http,
        pattern: r#"["'`](/api/[^\s"'`]+)["'`]"#,
    },
    CallPattern { protocol: Protocol::Curl, pattern: r"\b(?:curl|wget)\b" },
    CallPattern { protocol: Protocol::Curl, pattern: r"Invoke-WebRequest" },
];

/// An [`EndpointPattern`] with its regex compiled.
pub struct CompiledEndpoint {
    /// HTTP verb this pattern implies, if any.
    pub method: Option<&'static str>,
    /// Compiled pattern, path as capture group 1.
    pub regex: Regex,
}

/// A [`CallPattern`] with its regex compiled.
pub struct CompiledCall {
    /// Protocol family recorded for matches.
    pub protocol: Protocol,
    /// Compiled pattern, optional literal target as capture group 1.
    pub regex: Regex,
}

/// An [`EcosystemProfile`] with all patterns compiled.
pub struct CompiledProfile {
    /// The ecosystem this entry describes.
    pub ecosystem: Ecosystem,
    /// Manifest filenames whose presence marks the ecosystem as detected.
    pub manifests: &'static [&'static str],
    /// Source-file extensions scanned for endpoints and calls.
    pub extensions: &'static [&'static str],
    /// Compiled endpoint patterns.
    pub endpoints: Vec<CompiledEndpoint>,
    /// Compiled call patterns.
    pub calls: Vec<CompiledCall>,
}

/// Returns the registry with all patterns compiled, built once.
///
/// # Panics
///
/// Panics if a registered pattern is not a valid regex; the full table is
/// covered by a unit test, so this cannot fire at runtime for a released
/// binary.
pub fn compiled() -> &'static [CompiledProfile] {
    static COMPILED: OnceLock<Vec<CompiledProfile>> = OnceLock::new();
    COMPILED.get_or_init(|| {
        PROFILES
            .iter()
            .map(|p| CompiledProfile {
                ecosystem: p.ecosystem,
                manifests: p.manifests,
                extensions: p.extensions,
                endpoints: p
                    .endpoints
                    .iter()
                    .map(|e| CompiledEndpoint {
                        method: e.method,
                        regex: compile(e.pattern),
                    })
                    .collect(),
                calls: p.calls.iter().map(compile_call).collect(),
            })
            .collect()
    })
}

/// Returns the common call patterns compiled, built once.
///
/// # Panics
///
/// Same compile-time-constant guarantee as [`compiled`].
pub fn compiled_common_calls() -> &'static [CompiledCall] {
    static COMPILED: OnceLock<Vec<CompiledCall>> = OnceLock::new();
    COMPILED.get_or_init(|| COMMON_CALLS.iter().map(compile_call).collect())
}

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("registry pattern must compile")
}

fn compile_call(call: &CallPattern) -> CompiledCall {
    CompiledCall { protocol: call.protocol, regex: compile(call.pattern) }
}

/// Returns the ecosystem that claims the given manifest filename, if any.
#[must_use]
pub fn ecosystem_for_manifest(file_name: &str) -> Option<Ecosystem> {
    PROFILES
        .iter()
        .find(|p| p.manifests.contains(&file_name))
        .map(|p| p.ecosystem)
}

/// Returns the compiled profile for one ecosystem.
///
/// # Panics
///
/// Panics if the registry has no entry for the ecosystem; a unit test
/// asserts coverage of every variant.
#[must_use]
pub fn profile(ecosystem: Ecosystem) -> &'static CompiledProfile {
    compiled()
        .iter()
        .find(|p| p.ecosystem == ecosystem)
        .expect("every ecosystem has a registry entry")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_pattern_compiles() {
        assert_eq!(compiled().len(), PROFILES.len());
        assert!(!compiled_common_calls().is_empty());
    }

    #[test]
    fn every_ecosystem_has_a_profile() {
        for eco in [
            Ecosystem::Maven,
            Ecosystem::Gradle,
            Ecosystem::Node,
            Ecosystem::Python,
            Ecosystem::Go,
            Ecosystem::Php,
        ] {
            assert_eq!(profile(eco).ecosystem, eco);
        }
    }

    #[test]
    fn manifest_names_resolve_to_their_ecosystem() {
        assert_eq!(ecosystem_for_manifest("pom.xml"), Some(Ecosystem::Maven));
        assert_eq!(ecosystem_for_manifest("build.gradle.kts"), Some(Ecosystem::Gradle));
        assert_eq!(ecosystem_for_manifest("package.json"), Some(Ecosystem::Node));
        assert_eq!(ecosystem_for_manifest("setup.py"), Some(Ecosystem::Python));
        assert_eq!(ecosystem_for_manifest("go.mod"), Some(Ecosystem::Go));
        assert_eq!(ecosystem_for_manifest("composer.json"), Some(Ecosystem::Php));
        assert_eq!(ecosystem_for_manifest("Cargo.toml"), None);
    }

    #[test]
    fn spring_get_mapping_matches() {
        let profile = profile(Ecosystem::Maven);
        let content = r#"@GetMapping("/users")"#;
        let hit = profile
            .endpoints
            .iter()
            .find_map(|e| e.regex.captures(content).map(|c| (e.method, c)));
        let (method, caps) = hit.expect("pattern should match");
        assert_eq!(method, Some("GET"));
        assert_eq!(&caps[1], "/users");
    }

    #[test]
    fn axios_literal_target_is_captured() {
        let profile = profile(Ecosystem::Node);
        let content = "axios.get('http://payment-service/charge')";
        let caps = profile
            .calls
            .iter()
            .find_map(|c| c.regex.captures(content))
            .expect("pattern should match");
        assert_eq!(caps.get(1).map(|m| m.as_str()), Some("http://payment-service/charge"));
    }

    #[test]
    fn dynamic_axios_target_is_not_captured() {
        let profile = profile(Ecosystem::Node);
        let content = "axios.get(baseUrl + '/charge')";
        let caps = profile
            .calls
            .iter()
            .find_map(|c| c.regex.captures(content))
            .expect("pattern should still match the invocation");
        assert_eq!(caps.get(1), None);
    }
}
