//! 配置校验模块
//!
//! 校验规则：
//! - 每个类别的关联半径有限且 > 0
//! - tolerance_us 不超过一秒
//! - 派生的字段范围校验 (validator)

use contracts::{ContractError, EngineConfig, ObjectClass};
use validator::Validate;

/// Largest accepted camera window slack (one second)
const MAX_TOLERANCE_US: u64 = 1_000_000;

/// 校验 EngineConfig 配置
///
/// 返回第一个遇到的错误，或 Ok(())。
pub fn validate(config: &EngineConfig) -> Result<(), ContractError> {
    validate_radii(config)?;
    validate_sync(config)?;
    validate_derived(config)?;
    Ok(())
}

/// 校验关联半径
fn validate_radii(config: &EngineConfig) -> Result<(), ContractError> {
    for class in ObjectClass::ALL {
        let radius = config.radii.for_class(class);
        if !radius.is_finite() || radius <= 0.0 {
            return Err(ContractError::config_validation(
                format!("radii.{}", class),
                format!("radius must be finite and > 0, got {radius}"),
            ));
        }
    }
    Ok(())
}

/// 校验时间窗配置
fn validate_sync(config: &EngineConfig) -> Result<(), ContractError> {
    let tolerance = config.sync.tolerance_us;
    if tolerance > MAX_TOLERANCE_US {
        return Err(ContractError::config_validation(
            "sync.tolerance_us",
            format!("tolerance_us must be <= {MAX_TOLERANCE_US}, got {tolerance}"),
        ));
    }
    Ok(())
}

/// 派生规则兜底
fn validate_derived(config: &EngineConfig) -> Result<(), ContractError> {
    config
        .validate()
        .map_err(|e| ContractError::config_validation("engine", e.to_string()))
}
