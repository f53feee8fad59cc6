//! Typed label sets.
//!
//! One constructor per label shape used by the gauge table, so label
//! names are never spelled at call sites.

/// Shard label value for account-wide series.
pub const INTERSHARD: &str = "intershard";

/// Ordered label name/value pairs for one series.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LabelSet {
    pairs: Vec<(&'static str, String)>,
}

impl LabelSet {
    /// `{shard}`
    pub fn shard(shard: &str) -> Self {
        Self {
            pairs: vec![("shard", shard.to_string())],
        }
    }

    /// `{shard, type}`
    pub fn shard_typed(shard: &str, kind: &str) -> Self {
        Self::shard(shard).with("type", kind)
    }

    /// `{shard="intershard", type}`
    pub fn intershard(kind: &str) -> Self {
        Self::shard_typed(INTERSHARD, kind)
    }

    /// `{shard, room}`
    pub fn room(shard: &str, room: &str) -> Self {
        Self::shard(shard).with("room", room)
    }

    /// `{shard, room, type}`
    pub fn room_typed(shard: &str, room: &str, kind: &str) -> Self {
        Self::room(shard, room).with("type", kind)
    }

    /// `{shard, room, type, order_type, metric}`
    pub fn market_order(
        shard: &str,
        room: &str,
        resource_type: &str,
        order_type: &str,
        metric: &str,
    ) -> Self {
        Self::room_typed(shard, room, resource_type)
            .with("order_type", order_type)
            .with("metric", metric)
    }

    fn with(mut self, name: &'static str, value: &str) -> Self {
        self.pairs.push((name, value.to_string()));
        self
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.pairs.iter().map(|(name, _)| *name).collect()
    }

    pub fn values(&self) -> Vec<String> {
        self.pairs.iter().map(|(_, value)| value.clone()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn room_typed_order() {
        let labels = LabelSet::room_typed("shard0", "W1N1", "level");
        assert_eq!(labels.names(), vec!["shard", "room", "type"]);
        assert_eq!(labels.values(), vec!["shard0", "W1N1", "level"]);
    }

    #[test]
    fn intershard_labels() {
        let labels = LabelSet::intershard("money");
        assert_eq!(labels.get("shard"), Some("intershard"));
        assert_eq!(labels.get("type"), Some("money"));
        assert_eq!(labels.get("room"), None);
    }

    #[test]
    fn market_order_labels() {
        let labels = LabelSet::market_order("shard0", "W1N1", "energy", "sell", "price");
        assert_eq!(
            labels.names(),
            vec!["shard", "room", "type", "order_type", "metric"]
        );
        assert_eq!(labels.get("metric"), Some("price"));
    }
}
