//! Recording 校验
//!
//! 校验规则：
//! - cycles 时间戳单调不减
//! - 所有目标类别与 recording 的 object_class 一致
//! - 几何点数符合类别要求，坐标有限
//! - 每个相机的 timeframe 时间戳单调不减
//! - odometry 时间戳严格递增

use contracts::{ContractError, DetectedObject, ObjectClass, Recording};

/// 校验 Recording，返回第一个遇到的错误
pub fn validate(recording: &Recording) -> Result<(), ContractError> {
    validate_cycles(recording)?;
    validate_sensor_frames(recording)?;
    validate_odometry(recording)?;
    Ok(())
}

fn validate_cycles(recording: &Recording) -> Result<(), ContractError> {
    for (i, pair) in recording.cycles.windows(2).enumerate() {
        if pair[1].timestamp < pair[0].timestamp {
            return Err(ContractError::recording_validation(
                format!("cycles[{}].timestamp", i + 1),
                format!(
                    "timestamp {} precedes previous cycle {}",
                    pair[1].timestamp, pair[0].timestamp
                ),
            ));
        }
    }

    for (i, cycle) in recording.cycles.iter().enumerate() {
        for (j, object) in cycle.objects.iter().enumerate() {
            validate_object(
                object,
                recording.object_class,
                &format!("cycles[{i}].objects[{j}]"),
            )?;
        }
    }
    Ok(())
}

fn validate_sensor_frames(recording: &Recording) -> Result<(), ContractError> {
    for (camera, frames) in recording.sensor_frames.iter() {
        for (i, pair) in frames.windows(2).enumerate() {
            if pair[1].timestamp < pair[0].timestamp {
                return Err(ContractError::recording_validation(
                    format!("sensor_frames.{camera}[{}].timestamp", i + 1),
                    "camera timeframes must be ordered by timestamp",
                ));
            }
        }

        for (i, frame) in frames.iter().enumerate() {
            for (j, object) in frame.objects.iter().enumerate() {
                validate_object(
                    object,
                    recording.object_class,
                    &format!("sensor_frames.{camera}[{i}].objects[{j}]"),
                )?;
            }
        }
    }
    Ok(())
}

fn validate_odometry(recording: &Recording) -> Result<(), ContractError> {
    for (i, pair) in recording.odometry.windows(2).enumerate() {
        if pair[1].timestamp <= pair[0].timestamp {
            return Err(ContractError::recording_validation(
                format!("odometry[{}].timestamp", i + 1),
                "odometry timestamps must be strictly increasing",
            ));
        }
    }

    for (i, sample) in recording.odometry.iter().enumerate() {
        if !(sample.x.is_finite() && sample.y.is_finite() && sample.yaw.is_finite()) {
            return Err(ContractError::recording_validation(
                format!("odometry[{i}]"),
                "pose must be finite",
            ));
        }
    }
    Ok(())
}

fn validate_object(
    object: &DetectedObject,
    class: ObjectClass,
    field: &str,
) -> Result<(), ContractError> {
    if object.class() != class {
        return Err(ContractError::recording_validation(
            format!("{field}.class"),
            format!("expected {class}, got {}", object.class()),
        ));
    }

    let expected = class.expected_points();
    if object.geometry.len() != expected {
        return Err(ContractError::recording_validation(
            format!("{field}.geometry"),
            format!(
                "{class} needs {expected} points, got {}",
                object.geometry.len()
            ),
        ));
    }

    if let Some(k) = object.geometry.iter().position(|p| !p.is_finite()) {
        return Err(ContractError::recording_validation(
            format!("{field}.geometry[{k}]"),
            "coordinates must be finite",
        ));
    }
    Ok(())
}
