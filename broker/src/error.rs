//! Broker error types.

/// Errors that can occur during broker and data-source operations.
#[derive(Debug, thiserror::Error)]
pub enum BrokerError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("order error: {0}")]
    Order(String),

    #[error("not connected")]
    NotConnected,

    #[error("invalid symbol: {0}")]
    InvalidSymbol(String),

    #[error("authentication error: {0}")]
    Auth(String),

    #[error("rate limit exceeded")]
    RateLimit,

    #[error("malformed response: {0}")]
    Parse(String),
}

impl BrokerError {
    /// Map to the core's data-source error (prices, balances, market caps).
    pub fn into_data_source(self) -> capweight::Error {
        capweight::Error::DataSource(self.to_string())
    }

    /// Map to the core's order-sink error (submit, cancel).
    pub fn into_order_sink(self) -> capweight::Error {
        capweight::Error::OrderSink(self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_into_core_errors() {
        let e = BrokerError::RateLimit.into_data_source();
        assert_eq!(e, capweight::Error::DataSource("rate limit exceeded".into()));

        let e = BrokerError::Order("rejected".into()).into_order_sink();
        assert_eq!(e, capweight::Error::OrderSink("order error: rejected".into()));
    }

    #[test]
    fn every_variant_has_a_message() {
        let all = [
            BrokerError::Connection("timeout".into()),
            BrokerError::Order("rejected".into()),
            BrokerError::NotConnected,
            BrokerError::InvalidSymbol("XYZ".into()),
            BrokerError::Auth("bad key".into()),
            BrokerError::RateLimit,
            BrokerError::Parse("eof".into()),
        ];
        for e in all {
            let core = e.into_order_sink();
            assert!(matches!(&core, capweight::Error::OrderSink(m) if !m.is_empty()));
        }
    }
}
