// Record codec
//
// Layout of one stored record (all integers big-endian):
//
//   +----------------+---------------------------------------------+
//   | u32 length L   | L bytes of payload                          |
//   +----------------+---------------------------------------------+
//
// The payload holds the fields in schema order: INT as u32, VARCHAR as a
// u16 byte length followed by the raw bytes.

use byteorder::{BigEndian, ByteOrder, WriteBytesExt};

use crate::catalog::{Column, DataType, Record, Schema, Value};
use crate::common::types::{INT_SIZE, LENGTH_PREFIX_SIZE, VARCHAR_PREFIX_SIZE};
use crate::storage::error::{Result, StorageError};

/// Encode a record into its length-prefixed on-disk form
pub fn encode(record: &Record, schema: &Schema) -> Result<Vec<u8>> {
    let payload = encode_payload(record, schema)?;
    frame(&payload)
}

/// Encode the fields of a record in schema order, without the length prefix
pub fn encode_payload(record: &Record, schema: &Schema) -> Result<Vec<u8>> {
    let mut payload = Vec::new();

    for column in schema.columns() {
        let value = record.get(column.name()).ok_or_else(|| {
            StorageError::SchemaMismatch(format!("Missing value for column: {}", column.name()))
        })?;

        match (column.data_type(), value) {
            (DataType::Int, Value::Int(v)) => {
                payload.write_u32::<BigEndian>(*v)?;
            }
            (DataType::Varchar, Value::Varchar(s)) => {
                let length = u16::try_from(s.len()).map_err(|_| {
                    StorageError::SchemaMismatch(format!(
                        "VARCHAR value for column {} is {} bytes, limit is {}",
                        column.name(),
                        s.len(),
                        u16::MAX
                    ))
                })?;
                payload.write_u16::<BigEndian>(length)?;
                payload.extend_from_slice(s.as_bytes());
            }
            (expected, value) => {
                return Err(StorageError::SchemaMismatch(format!(
                    "Column {} expects {}, got {}",
                    column.name(),
                    expected,
                    value.data_type()
                )));
            }
        }
    }

    Ok(payload)
}

/// Prefix a payload with its 4-byte big-endian length
pub fn frame(payload: &[u8]) -> Result<Vec<u8>> {
    let length = u32::try_from(payload.len()).map_err(|_| {
        StorageError::SchemaMismatch(format!("payload of {} bytes is too large", payload.len()))
    })?;

    let mut bytes = Vec::with_capacity(LENGTH_PREFIX_SIZE + payload.len());
    bytes.write_u32::<BigEndian>(length)?;
    bytes.extend_from_slice(payload);
    Ok(bytes)
}

/// Read the payload length stored at the start of `bytes`, if there is room for one
pub fn read_length_prefix(bytes: &[u8]) -> Option<usize> {
    if bytes.len() < LENGTH_PREFIX_SIZE {
        return None;
    }
    Some(BigEndian::read_u32(&bytes[..LENGTH_PREFIX_SIZE]) as usize)
}

/// Decode a length-prefixed record
pub fn decode(bytes: &[u8], schema: &Schema) -> Result<Record> {
    let length = read_length_prefix(bytes).ok_or_else(|| StorageError::TruncatedRecord {
        column: "<length prefix>".to_string(),
        needed: LENGTH_PREFIX_SIZE,
        remaining: bytes.len(),
    })?;

    let body = &bytes[LENGTH_PREFIX_SIZE..];
    if body.len() < length {
        return Err(StorageError::TruncatedRecord {
            column: "<payload>".to_string(),
            needed: length,
            remaining: body.len(),
        });
    }

    decode_payload(&body[..length], schema)
}

/// Decode an un-prefixed payload, consuming fields in schema order
pub fn decode_payload(payload: &[u8], schema: &Schema) -> Result<Record> {
    let mut record = Record::new();
    let mut offset = 0;

    for column in schema.columns() {
        let remaining = &payload[offset..];
        let (value, consumed) = match column.data_type() {
            DataType::Int => decode_int(remaining, column)?,
            DataType::Varchar => decode_varchar(remaining, column)?,
        };
        record.set(column.name(), value);
        offset += consumed;
    }

    Ok(record)
}

fn decode_int(bytes: &[u8], column: &Column) -> Result<(Value, usize)> {
    if bytes.len() < INT_SIZE {
        return Err(StorageError::TruncatedRecord {
            column: column.name().to_string(),
            needed: INT_SIZE,
            remaining: bytes.len(),
        });
    }
    Ok((Value::Int(BigEndian::read_u32(&bytes[..INT_SIZE])), INT_SIZE))
}

fn decode_varchar(bytes: &[u8], column: &Column) -> Result<(Value, usize)> {
    if bytes.len() < VARCHAR_PREFIX_SIZE {
        return Err(StorageError::InvalidVarchar {
            column: column.name().to_string(),
            reason: format!("{} bytes left for the length prefix", bytes.len()),
        });
    }

    let length = BigEndian::read_u16(&bytes[..VARCHAR_PREFIX_SIZE]) as usize;
    let body = &bytes[VARCHAR_PREFIX_SIZE..];
    if body.len() < length {
        return Err(StorageError::InvalidVarchar {
            column: column.name().to_string(),
            reason: format!("declared {} bytes, {} remaining", length, body.len()),
        });
    }

    let text = std::str::from_utf8(&body[..length]).map_err(|e| StorageError::InvalidVarchar {
        column: column.name().to_string(),
        reason: e.to_string(),
    })?;

    Ok((Value::Varchar(text.to_string()), VARCHAR_PREFIX_SIZE + length))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn people_schema() -> Schema {
        Schema::new(vec![
            Column::int("id"),
            Column::varchar("name"),
            Column::int("score"),
        ])
        .unwrap()
    }

    #[test]
    fn test_encode_layout() {
        let record = Record::new()
            .with("id", 1u32)
            .with("name", "Ann")
            .with("score", 258u32);

        let bytes = encode(&record, &people_schema()).unwrap();
        assert_eq!(
            bytes,
            vec![
                0, 0, 0, 13, // payload length
                0, 0, 0, 1, // id
                0, 3, b'A', b'n', b'n', // name
                0, 0, 1, 2, // score
            ]
        );
    }

    #[test]
    fn test_encode_uses_schema_order_and_ignores_extra_fields() {
        let schema = people_schema();
        let shuffled = Record::new()
            .with("score", 9u32)
            .with("nickname", "ignored")
            .with("name", "Bo")
            .with("id", 2u32);
        let ordered = Record::new().with("id", 2u32).with("name", "Bo").with("score", 9u32);

        assert_eq!(encode(&shuffled, &schema).unwrap(), encode(&ordered, &schema).unwrap());
    }

    #[test]
    fn test_encode_missing_column() {
        let record = Record::new().with("id", 1u32).with("score", 3u32);
        match encode(&record, &people_schema()) {
            Err(StorageError::SchemaMismatch(msg)) => assert!(msg.contains("name")),
            other => panic!("Expected SchemaMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_encode_wrong_type() {
        let record = Record::new().with("id", "one").with("name", "Ann").with("score", 3u32);
        assert!(matches!(
            encode(&record, &people_schema()),
            Err(StorageError::SchemaMismatch(_))
        ));
    }

    #[test]
    fn test_encode_varchar_too_long() {
        let schema = Schema::new(vec![Column::varchar("blob")]).unwrap();
        let record = Record::new().with("blob", "x".repeat(70_000));
        assert!(matches!(encode(&record, &schema), Err(StorageError::SchemaMismatch(_))));
    }

    #[test]
    fn test_round_trip() {
        let schema = people_schema();
        let record = Record::new()
            .with("id", u32::MAX)
            .with("name", "Zoë")
            .with("score", 0u32);

        let bytes = encode(&record, &schema).unwrap();
        let decoded = decode(&bytes, &schema).unwrap();
        assert_eq!(decoded, record);
        assert_eq!(encode(&decoded, &schema).unwrap(), bytes);
    }

    #[test]
    fn test_decode_truncated_int() {
        let schema = people_schema();
        // id present, name present, score cut short
        let payload = [0, 0, 0, 1, 0, 1, b'x', 0, 0];
        match decode_payload(&payload, &schema) {
            Err(StorageError::TruncatedRecord { column, needed, remaining }) => {
                assert_eq!(column, "score");
                assert_eq!(needed, 4);
                assert_eq!(remaining, 2);
            }
            other => panic!("Expected TruncatedRecord, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_invalid_varchar() {
        let schema = Schema::new(vec![Column::varchar("name")]).unwrap();

        // Declared length overruns the payload
        assert!(matches!(
            decode_payload(&[0, 9, b'a', b'b'], &schema),
            Err(StorageError::InvalidVarchar { .. })
        ));

        // Not UTF-8
        assert!(matches!(
            decode_payload(&[0, 2, 0xff, 0xfe], &schema),
            Err(StorageError::InvalidVarchar { .. })
        ));

        // No room for the length prefix
        assert!(matches!(
            decode_payload(&[0], &schema),
            Err(StorageError::InvalidVarchar { .. })
        ));
    }

    #[test]
    fn test_decode_prefix_longer_than_bytes() {
        let schema = people_schema();
        assert!(matches!(
            decode(&[0, 0, 0, 40, 0, 0, 0, 1], &schema),
            Err(StorageError::TruncatedRecord { .. })
        ));
        assert!(matches!(decode(&[0, 0], &schema), Err(StorageError::TruncatedRecord { .. })));
    }

    #[test]
    fn test_frame_and_read_prefix() {
        let framed = frame(b"hello").unwrap();
        assert_eq!(&framed[..4], &[0, 0, 0, 5]);
        assert_eq!(read_length_prefix(&framed), Some(5));
        assert_eq!(read_length_prefix(&framed[..3]), None);
    }
}
