use serde::{Deserialize, Serialize};

/// Body of the remote coin-metrics endpoint.
/// Every field is optional; the dashboard stores whatever was present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoinMessage {
    pub market_cap: Option<f64>,
    pub usd_market_cap: Option<f64>,
    pub holder_count: Option<i32>,
    pub reply_count: Option<i32>,
    pub ath_market_cap: Option<f64>,
    pub price: Option<f64>,
    pub volume_24h: Option<f64>,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parse_coin_metrics() {
        let msg: CoinMessage = serde_json::from_str(
            r#"{
                "market_cap": 120.5,
                "usd_market_cap": 24000.0,
                "holder_count": 321,
                "reply_count": 87,
                "ath_market_cap": 50000.0,
                "price": 0.000024,
                "volume_24h": 1337.0,
                "name": "ignored extra field"
            }"#,
        )
        .unwrap();

        assert_eq!(msg.holder_count, Some(321));
        assert_eq!(msg.price, Some(0.000024));
    }

    #[test]
    fn missing_fields_stay_none() {
        let msg: CoinMessage = serde_json::from_str(r#"{"price": 1.0}"#).unwrap();
        assert_eq!(msg.price, Some(1.0));
        assert_eq!(msg.market_cap, None);
        assert_eq!(msg.reply_count, None);
    }
}
