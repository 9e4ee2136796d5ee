use serde_json::{Map, Value};
use tradelens_domain::repositories::trade_store::EnvelopeError;
use tradelens_domain::value_objects::trade::{AggTradeEnvelope, TradeRecord};

// Aggregated trade stream payload, e.g.
// {"stream":"btcusdt@aggTrade","data":{"e":"aggTrade","E":1,"s":"BTCUSDT","a":1,
//  "p":"100.0","q":"0.1","f":1,"l":1,"T":1,"m":false}}

pub fn decode_envelope(raw: &str) -> Result<AggTradeEnvelope, EnvelopeError> {
    let root: Value =
        serde_json::from_str(raw).map_err(|err| EnvelopeError::InvalidJson(err.to_string()))?;
    let root = root.as_object().ok_or(EnvelopeError::WrongType {
        field: "<root>",
        expected: "object",
    })?;
    let stream = optional_str(root, "stream")?;
    let data = object_field(root, "data")?;

    Ok(AggTradeEnvelope {
        stream,
        event_type: optional_str(data, "e")?,
        event_time_ms: optional_i64(data, "E")?,
        first_trade_id: optional_i64(data, "f")?,
        last_trade_id: optional_i64(data, "l")?,
        trade: trade_from_data(data)?,
    })
}

/// Decodes only the fields needed for a history row.
pub fn decode_trade(raw: &str) -> Result<TradeRecord, EnvelopeError> {
    let root: Value =
        serde_json::from_str(raw).map_err(|err| EnvelopeError::InvalidJson(err.to_string()))?;
    let root = root.as_object().ok_or(EnvelopeError::WrongType {
        field: "<root>",
        expected: "object",
    })?;
    trade_from_data(object_field(root, "data")?)
}

/// Inverse of [`decode_envelope`], used to seed in-memory stores.
pub fn encode_envelope(envelope: &AggTradeEnvelope) -> String {
    let trade = &envelope.trade;
    let mut data = Map::new();
    if let Some(event_type) = &envelope.event_type {
        data.insert("e".to_string(), Value::from(event_type.as_str()));
    }
    if let Some(event_time) = envelope.event_time_ms {
        data.insert("E".to_string(), Value::from(event_time));
    }
    data.insert("s".to_string(), Value::from(trade.symbol.as_str()));
    data.insert("a".to_string(), Value::from(trade.trade_id));
    data.insert("p".to_string(), Value::from(trade.price.to_string()));
    data.insert("q".to_string(), Value::from(trade.quantity.to_string()));
    if let Some(first) = envelope.first_trade_id {
        data.insert("f".to_string(), Value::from(first));
    }
    if let Some(last) = envelope.last_trade_id {
        data.insert("l".to_string(), Value::from(last));
    }
    data.insert("T".to_string(), Value::from(trade.trade_time_ms));
    data.insert("m".to_string(), Value::from(trade.is_buyer_maker));

    let mut root = Map::new();
    if let Some(stream) = &envelope.stream {
        root.insert("stream".to_string(), Value::from(stream.as_str()));
    }
    root.insert("data".to_string(), Value::Object(data));
    Value::Object(root).to_string()
}

pub fn encode_trade(trade: &TradeRecord) -> String {
    encode_envelope(&AggTradeEnvelope {
        stream: Some(format!("{}@aggTrade", trade.symbol.to_lowercase())),
        event_type: Some("aggTrade".to_string()),
        event_time_ms: Some(trade.trade_time_ms),
        first_trade_id: Some(trade.trade_id),
        last_trade_id: Some(trade.trade_id),
        trade: trade.clone(),
    })
}

fn trade_from_data(data: &Map<String, Value>) -> Result<TradeRecord, EnvelopeError> {
    Ok(TradeRecord {
        symbol: required_str(data, "s")?.to_string(),
        price: decimal_str(data, "p")?,
        quantity: decimal_str(data, "q")?,
        trade_time_ms: required_i64(data, "T")?,
        is_buyer_maker: required_bool(data, "m")?,
        trade_id: required_i64(data, "a")?,
    })
}

fn object_field<'a>(
    map: &'a Map<String, Value>,
    field: &'static str,
) -> Result<&'a Map<String, Value>, EnvelopeError> {
    match map.get(field) {
        None | Some(Value::Null) => Err(EnvelopeError::MissingField(field)),
        Some(value) => value.as_object().ok_or(EnvelopeError::WrongType {
            field,
            expected: "object",
        }),
    }
}

fn required_str<'a>(
    map: &'a Map<String, Value>,
    field: &'static str,
) -> Result<&'a str, EnvelopeError> {
    optional_str_ref(map, field)?.ok_or(EnvelopeError::MissingField(field))
}

fn optional_str(
    map: &Map<String, Value>,
    field: &'static str,
) -> Result<Option<String>, EnvelopeError> {
    Ok(optional_str_ref(map, field)?.map(str::to_string))
}

fn optional_str_ref<'a>(
    map: &'a Map<String, Value>,
    field: &'static str,
) -> Result<Option<&'a str>, EnvelopeError> {
    match map.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(value)) => Ok(Some(value.as_str())),
        Some(_) => Err(EnvelopeError::WrongType {
            field,
            expected: "string",
        }),
    }
}

fn decimal_str(map: &Map<String, Value>, field: &'static str) -> Result<f64, EnvelopeError> {
    let raw = required_str(map, field)?;
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(EnvelopeError::InvalidNumber {
            field,
            value: raw.to_string(),
        }),
    }
}

fn required_i64(map: &Map<String, Value>, field: &'static str) -> Result<i64, EnvelopeError> {
    optional_i64(map, field)?.ok_or(EnvelopeError::MissingField(field))
}

fn optional_i64(
    map: &Map<String, Value>,
    field: &'static str,
) -> Result<Option<i64>, EnvelopeError> {
    match map.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value.as_i64().map(Some).ok_or(EnvelopeError::WrongType {
            field,
            expected: "integer",
        }),
    }
}

fn required_bool(map: &Map<String, Value>, field: &'static str) -> Result<bool, EnvelopeError> {
    match map.get(field) {
        None | Some(Value::Null) => Err(EnvelopeError::MissingField(field)),
        Some(value) => value.as_bool().ok_or(EnvelopeError::WrongType {
            field,
            expected: "bool",
        }),
    }
}
