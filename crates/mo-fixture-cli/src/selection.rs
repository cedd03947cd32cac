//! Topology selection from loose argument words.
//!
//! Words are matched by substring, not parsed as flags, so `repl-auth`,
//! `shard4` and `./launch repl single` all work.

use mo_fixture_core::{CoreError, ReplicaSetShape, TopologyKind, SUPPORTED_VERSIONS};

/// What the argument words asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    /// Deployment to launch.
    pub kind: TopologyKind,
    /// Enable authentication.
    pub auth: bool,
    /// Enable TLS.
    pub tls: bool,
    /// Pinned server version.
    pub version: Option<&'static str>,
    /// Starting port override; the last integer word wins.
    pub port: Option<u16>,
}

fn has(words: &[String], needle: &str) -> bool {
    words.iter().any(|word| word.contains(needle))
}

/// Interpret argument words.
///
/// # Errors
///
/// Returns `CoreError::NoTopology` if no word names a topology.
pub fn select(words: &[String]) -> Result<Selection, CoreError> {
    let single = has(words, "single") || has(words, "standalone") || has(words, "mongod");

    let kind = if has(words, "repl") {
        let shape = if single {
            ReplicaSetShape::Single
        } else {
            ReplicaSetShape::Three
        };
        TopologyKind::ReplicaSet(shape)
    } else if has(words, "shard4") {
        TopologyKind::ShardedCluster {
            shards: 4,
            shard_shape: ReplicaSetShape::Three,
        }
    } else if has(words, "shard3") {
        TopologyKind::ShardedCluster {
            shards: 1,
            shard_shape: ReplicaSetShape::Three,
        }
    } else if has(words, "shard") || has(words, "mongos") {
        TopologyKind::ShardedCluster {
            shards: 1,
            shard_shape: ReplicaSetShape::Single,
        }
    } else if single {
        TopologyKind::Standalone
    } else {
        return Err(CoreError::NoTopology);
    };

    Ok(Selection {
        kind,
        auth: has(words, "auth"),
        tls: has(words, "ssl") || has(words, "tls"),
        version: SUPPORTED_VERSIONS
            .into_iter()
            .find(|version| has(words, version)),
        port: words.iter().rev().find_map(|word| word.parse().ok()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn repl_defaults_to_three_members() {
        let selection = select(&words(&["repl"])).unwrap();
        assert_eq!(selection.kind, TopologyKind::ReplicaSet(ReplicaSetShape::Three));
        assert!(!selection.auth);
        assert!(!selection.tls);
        assert_eq!(selection.version, None);
        assert_eq!(selection.port, None);
    }

    #[test]
    fn repl_single_is_one_member() {
        let selection = select(&words(&["repl", "single", "auth"])).unwrap();
        assert_eq!(selection.kind, TopologyKind::ReplicaSet(ReplicaSetShape::Single));
        assert!(selection.auth);
    }

    #[test]
    fn shard_variants() {
        assert_eq!(
            select(&words(&["shard4"])).unwrap().kind.process_count(),
            14
        );
        assert_eq!(
            select(&words(&["shard3"])).unwrap().kind,
            TopologyKind::ShardedCluster {
                shards: 1,
                shard_shape: ReplicaSetShape::Three
            }
        );
        for word in ["shard", "mongos"] {
            assert_eq!(
                select(&words(&[word])).unwrap().kind,
                TopologyKind::ShardedCluster {
                    shards: 1,
                    shard_shape: ReplicaSetShape::Single
                }
            );
        }
    }

    #[test]
    fn standalone_aliases() {
        for word in ["single", "standalone", "mongod"] {
            assert_eq!(
                select(&words(&[word])).unwrap().kind,
                TopologyKind::Standalone
            );
        }
    }

    #[test]
    fn modifiers_and_port() {
        let selection = select(&words(&["28000", "single", "tls", "v3.2.10"])).unwrap();
        assert!(selection.tls);
        assert_eq!(selection.version, Some("3.2.10"));
        assert_eq!(selection.port, Some(28000));
    }

    #[test]
    fn last_port_word_wins() {
        let selection = select(&words(&["29000", "repl", "30000"])).unwrap();
        assert_eq!(selection.port, Some(30000));
    }

    #[test]
    fn ssl_is_a_tls_alias() {
        assert!(select(&words(&["single", "ssl"])).unwrap().tls);
    }

    #[test]
    fn nothing_selected() {
        assert!(matches!(
            select(&words(&["auth", "ssl"])),
            Err(CoreError::NoTopology)
        ));
        assert!(select(&[]).is_err());
    }
}
