//! Control-point (keyframe) track decoding.

use crate::codec::primitives::Reader;
use crate::error::DecodeError;
use crate::limits::{MAX_ELEMENT_COUNT, MAX_PER_POINT_COUNT};
use crate::model::{ControlPoint, ControlPointTrack, ControlValue, PerPointValue, TimeOffset, ValueType};

/// Reads a u16 value type code.
pub fn read_value_type(reader: &mut Reader<'_>) -> Result<ValueType, DecodeError> {
    let value = reader.read_u16("value_type")?;
    ValueType::from_u16(value).ok_or(DecodeError::UnknownValueType { value })
}

/// Reads one value of the given type.
pub fn read_control_value(
    reader: &mut Reader<'_>,
    value_type: ValueType,
) -> Result<ControlValue, DecodeError> {
    match value_type {
        ValueType::Int => Ok(ControlValue::Int(reader.read_i32("value")?)),
        ValueType::Double => Ok(ControlValue::Double(reader.read_f64("value")?)),
        ValueType::Reference => Ok(ControlValue::Reference(reader.read_ref("value")?)),
    }
}

/// Reads a count-prefixed keyframe list whose values have type `value_type`.
pub fn read_control_points(
    reader: &mut Reader<'_>,
    value_type: ValueType,
) -> Result<ControlPointTrack, DecodeError> {
    let count = reader.read_count(MAX_ELEMENT_COUNT, "control_points")?;
    // smallest point is 3 * 4 offset + 4 value + 2 count bytes
    let mut points = Vec::with_capacity(count.min(reader.remaining_len() / 18));

    for _ in 0..count {
        let offset = TimeOffset {
            numerator: reader.read_i32("offset_num")?,
            denominator: reader.read_i32("offset_den")?,
            timescale: reader.read_i32("timescale")?,
        };
        let value = read_control_value(reader, value_type)?;

        let pp_count = reader.read_u16("per_point_count")? as usize;
        if pp_count > MAX_PER_POINT_COUNT {
            return Err(DecodeError::LengthExceedsLimit {
                field: "per_point",
                len: pp_count,
                max: MAX_PER_POINT_COUNT,
            });
        }
        let mut per_point = Vec::with_capacity(pp_count.min(reader.remaining_len() / 8));
        for _ in 0..pp_count {
            let code = reader.read_i16("per_point.code")?;
            let pp_type = read_value_type(reader)?;
            if pp_type == ValueType::Reference {
                return Err(DecodeError::UnknownValueType {
                    value: pp_type as u16,
                });
            }
            let value = read_control_value(reader, pp_type)?;
            per_point.push(PerPointValue { code, value });
        }

        points.push(ControlPoint {
            offset,
            value,
            per_point,
        });
    }

    Ok(ControlPointTrack { value_type, points })
}
