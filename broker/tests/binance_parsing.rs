//! Tests for Binance API response parsing and auth, no live connection needed.

#[cfg(feature = "binance")]
mod binance_tests {
    use capweight_broker::binance::client::parse_api_error;
    use capweight_broker::binance::types::{AccountInfo, ApiError, OrderResponse, TickerPrice};
    use capweight::{Order, Side};
    use capweight_broker::binance::auth::Signer;
    use capweight_broker::binance::{balances_from_account, format_decimal, order_params};

    // ========================================================================
    // HMAC-SHA256 signing
    // ========================================================================

    #[test]
    fn sign_binance_docs_example() {
        let query = "symbol=LTCBTC&side=BUY&type=LIMIT&timeInForce=GTC\
                     &quantity=1&price=0.1&recvWindow=5000&timestamp=1499827319559";
        let secret = "NhqPtmdSJYdKjVHjA7PZj4Mge3R5YNiP1e3UZjInClVN65XAbvqqM6A7H5fATj0j";
        let signer = Signer::new(secret).unwrap();
        assert_eq!(
            signer.signature(query),
            "c8db56825ae71d6d79447849e617115f4a920fa2acdcab2b053c4b2838bd6b71"
        );
    }

    #[test]
    fn signed_query_for_wire_order() {
        let order = Order::limit("BTCUSDT", Side::Sell, 0.5, 41_250.5);
        let (quantity, price) = order_params(&order).unwrap();
        let query = format!(
            "symbol={}&side={}&type=LIMIT&timeInForce=GTC&quantity={quantity}&price={price}&timestamp=1",
            order.symbol,
            order.side.as_str()
        );
        let signed = Signer::new("key1").unwrap().sign_query(&query);
        let (body, signature) = signed.rsplit_once("&signature=").unwrap();
        assert_eq!(body, "symbol=BTCUSDT&side=SELL&type=LIMIT&timeInForce=GTC&quantity=0.5&price=41250.5&timestamp=1");
        assert_eq!(signature.len(), 64, "SHA256 hex is always 64 chars");
        assert_ne!(signature, Signer::new("key2").unwrap().signature(&query));
    }

    // ========================================================================
    // Account → balances
    // ========================================================================

    #[test]
    fn account_to_balances() {
        let json = r#"{
            "balances": [
                { "asset": "BTC", "free": "1.00000000", "locked": "0.50000000" },
                { "asset": "USDT", "free": "10000.00", "locked": "0.00" },
                { "asset": "DOGE", "free": "0.00000000", "locked": "0.00000000" }
            ],
            "canTrade": true
        }"#;
        let info: AccountInfo = serde_json::from_str(json).unwrap();
        assert!(info.can_trade);

        let balances = balances_from_account(&info).unwrap();
        assert_eq!(balances.len(), 2, "empty DOGE entry is skipped");
        assert_eq!(balances["BTC"].available, 1.0);
        assert_eq!(balances["BTC"].total, 1.5);
        assert_eq!(balances["USDT"].total, 10_000.0);
    }

    #[test]
    fn account_with_garbage_amount_is_parse_error() {
        let json = r#"{ "balances": [ { "asset": "BTC", "free": "n/a", "locked": "0" } ] }"#;
        let info: AccountInfo = serde_json::from_str(json).unwrap();
        assert!(balances_from_account(&info).is_err());
    }

    // ========================================================================
    // Ticker, orders, errors
    // ========================================================================

    #[test]
    fn parse_ticker_price() {
        let json = r#"{ "symbol": "ETHUSDT", "price": "2500.12000000" }"#;
        let t: TickerPrice = serde_json::from_str(json).unwrap();
        assert_eq!(t.symbol, "ETHUSDT");
        assert_eq!(t.price.parse::<f64>().unwrap(), 2500.12);
    }

    #[test]
    fn parse_order_response() {
        let json = r#"{
            "symbol": "BTCUSDT",
            "orderId": 28,
            "clientOrderId": "6gCrw2kRUAF9CvJDGP16IP",
            "transactTime": 1507725176595,
            "price": "40000.00000000",
            "origQty": "0.01000000",
            "executedQty": "0.00000000",
            "cummulativeQuoteQty": "0.00000000",
            "status": "NEW",
            "timeInForce": "GTC",
            "type": "LIMIT",
            "side": "BUY"
        }"#;
        let resp: OrderResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.order_id, 28);
        assert_eq!(resp.status, "NEW");
        assert_eq!(resp.executed_qty, "0.00000000");
    }

    #[test]
    fn unknown_order_code() {
        let err = parse_api_error(r#"{"code":-2011,"msg":"Unknown order sent."}"#).unwrap();
        assert_eq!(err.code, ApiError::UNKNOWN_ORDER);
    }

    #[test]
    fn order_params_are_trimmed() {
        assert_eq!(format_decimal(0.012), "0.012");
        assert_eq!(format_decimal(2500.0), "2500");
    }
}
