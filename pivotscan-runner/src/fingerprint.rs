//! Run fingerprinting — content-addressable id for a scan or backtest config.
//!
//! Two runs with identical configuration share a fingerprint, which names
//! their result artifacts on disk.

use serde::Serialize;

/// Deterministic hex id for any serializable configuration.
pub fn run_id<T: Serialize>(config: &T) -> String {
    let json = serde_json::to_string(config).expect("config serialization failed");
    blake3::hash(json.as_bytes()).to_hex().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Serialize)]
    struct Cfg {
        symbol: String,
        period: usize,
    }

    #[test]
    fn identical_configs_share_an_id() {
        let a = Cfg {
            symbol: "2330.TW".into(),
            period: 20,
        };
        let b = Cfg {
            symbol: "2330.TW".into(),
            period: 20,
        };
        assert_eq!(run_id(&a), run_id(&b));
    }

    #[test]
    fn different_configs_differ() {
        let a = Cfg {
            symbol: "2330.TW".into(),
            period: 20,
        };
        let b = Cfg {
            symbol: "2330.TW".into(),
            period: 60,
        };
        assert_ne!(run_id(&a), run_id(&b));
    }

    #[test]
    fn id_is_hex() {
        let id = run_id(&Cfg {
            symbol: "X".into(),
            period: 1,
        });
        assert_eq!(id.len(), 64);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
