//! Turns raw stick readings into relative motion
//!
//! Per axis: offset from the calibrated center, deadzone, scale, optional inversion, then clamp
//! to the event range.

use crate::event::MotionFrame;
use crate::input_device::adc::RawSample;
use crate::input_device::calibration::AxisCalibration;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConditioningParameters {
    /// Offsets with a magnitude up to this value are treated as rest
    pub deadzone: u16,
    /// Divisor applied after the deadzone, 0 behaves like 1
    pub scale_divisor: u16,
    pub invert_x: bool,
    pub invert_y: bool,
}

impl Default for ConditioningParameters {
    fn default() -> Self {
        Self {
            deadzone: crate::config::JOYSTICK_DEADZONE,
            scale_divisor: crate::config::JOYSTICK_SCALE_DIVISOR,
            invert_x: false,
            invert_y: false,
        }
    }
}

impl ConditioningParameters {
    pub fn effective_divisor(&self) -> u16 {
        self.scale_divisor.max(1)
    }

    /// Condition both axes of one sample
    pub fn condition(&self, sample: RawSample, calibration: &AxisCalibration) -> MotionFrame {
        let divisor = self.effective_divisor();
        MotionFrame::new(
            condition_axis(sample.x, calibration.center_x, self.deadzone, divisor, self.invert_x),
            condition_axis(sample.y, calibration.center_y, self.deadzone, divisor, self.invert_y),
        )
    }
}

/// Zero inside the deadzone, otherwise shift the value towards zero by the deadzone width
pub fn apply_deadzone(value: i32, deadzone: u16) -> i32 {
    if value.unsigned_abs() <= u32::from(deadzone) {
        0
    } else if value > 0 {
        value - i32::from(deadzone)
    } else {
        value + i32::from(deadzone)
    }
}

/// Integer division truncating towards zero
pub fn scale(value: i32, divisor: u16) -> i32 {
    value / i32::from(divisor.max(1))
}

pub fn condition_axis(raw: i16, center: i32, deadzone: u16, divisor: u16, invert: bool) -> i16 {
    let delta = i32::from(raw).saturating_sub(center);
    let mut value = scale(apply_deadzone(delta, deadzone), divisor);
    if invert {
        value = value.saturating_neg();
    }
    value.clamp(i32::from(i16::MIN), i32::from(i16::MAX)) as i16
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(deadzone: u16, scale_divisor: u16) -> ConditioningParameters {
        ConditioningParameters {
            deadzone,
            scale_divisor,
            invert_x: false,
            invert_y: false,
        }
    }

    #[test]
    fn test_deadzone_boundary() {
        assert_eq!(apply_deadzone(100, 100), 0);
        assert_eq!(apply_deadzone(-100, 100), 0);
        assert_eq!(apply_deadzone(101, 100), 1);
        assert_eq!(apply_deadzone(-101, 100), -1);
        assert_eq!(apply_deadzone(i32::MIN, 100), i32::MIN + 100);
    }

    #[test]
    fn test_identity_without_deadzone_and_scale() {
        let center = AxisCalibration::default();
        for raw in [i16::MIN, -2048, -1, 0, 1, 700, 2047, i16::MAX] {
            let frame = params(0, 1).condition(RawSample { x: raw, y: raw }, &center);
            assert_eq!(frame, MotionFrame::new(raw, raw));
        }
    }

    #[test]
    fn test_zero_divisor_behaves_like_one() {
        let center = AxisCalibration { center_x: 10, center_y: -10 };
        let sample = RawSample { x: 300, y: -300 };
        assert_eq!(params(5, 0).condition(sample, &center), params(5, 1).condition(sample, &center));
        assert_eq!(params(5, 0).effective_divisor(), 1);
    }

    #[test]
    fn test_inversion_flips_sign() {
        let center = AxisCalibration { center_x: 512, center_y: 512 };
        let sample = RawSample { x: 700, y: 100 };
        let plain = params(100, 2).condition(sample, &center);
        let inverted = ConditioningParameters {
            invert_x: true,
            invert_y: true,
            ..params(100, 2)
        }
        .condition(sample, &center);

        assert_eq!(inverted, MotionFrame::new(-plain.x, -plain.y));
    }

    #[test]
    fn test_rest_inside_deadzone() {
        // 612 - 512 = 100, exactly on the deadzone edge
        let center = AxisCalibration { center_x: 512, center_y: 512 };
        let frame = params(100, 1).condition(RawSample { x: 612, y: 512 }, &center);
        assert!(frame.is_empty());
    }

    #[test]
    fn test_deflection_is_scaled() {
        // (700 - 512 - 100) / 2 = 44
        let center = AxisCalibration { center_x: 512, center_y: 512 };
        let frame = params(100, 2).condition(RawSample { x: 700, y: 512 }, &center);
        assert_eq!(frame, MotionFrame::new(44, 0));
    }

    #[test]
    fn test_scale_truncates_towards_zero() {
        assert_eq!(scale(7, 2), 3);
        assert_eq!(scale(-7, 2), -3);
        assert_eq!(scale(-1, 128), 0);
    }

    #[test]
    fn test_extreme_offsets_are_clamped() {
        assert_eq!(condition_axis(i16::MIN, 40_000, 0, 1, false), i16::MIN);
        assert_eq!(condition_axis(i16::MAX, -40_000, 0, 1, false), i16::MAX);
        assert_eq!(condition_axis(i16::MIN, 0, 0, 1, true), i16::MAX);
    }
}
