//! Point light source.

use std::fmt;

use lc_math::Vector3;
use serde::{Deserialize, Serialize};

/// Point light.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Light {
    /// World-space position
    pub position: Vector3,
    /// Linear RGB
    pub color: Vector3,
    /// Non-negative scale applied to `color`
    pub intensity: f32,
}

impl Light {
    pub fn new(position: Vector3, color: Vector3, intensity: f32) -> Self {
        Self {
            position,
            color,
            intensity,
        }
    }

    /// Color scaled by intensity.
    pub fn radiant_color(&self) -> Vector3 {
        self.color * self.intensity
    }
}

impl Default for Light {
    /// White light of unit intensity one unit above the origin.
    fn default() -> Self {
        Self::new(Vector3::Y, Vector3::ONE, 1.0)
    }
}

impl fmt::Display for Light {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{ position: {}, color: {}, intensity: {} }}",
            self.position, self.color, self.intensity
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_light() {
        let light = Light::default();
        assert_eq!(light.position, Vector3::new(0.0, 1.0, 0.0));
        assert_eq!(light.color, Vector3::ONE);
        assert_eq!(light.intensity, 1.0);
    }

    #[test]
    fn test_radiant_color() {
        let light = Light::new(Vector3::ZERO, Vector3::new(1.0, 0.5, 0.25), 4.0);
        assert_eq!(light.radiant_color(), Vector3::new(4.0, 2.0, 1.0));
    }

    #[test]
    fn test_light_serde() {
        let light = Light::new(Vector3::new(0.0, 2.0, 1.0), Vector3::new(1.0, 0.9, 0.8), 3.0);
        let json = serde_json::to_string(&light).unwrap();
        assert!(json.contains("\"intensity\":3.0"));
        let parsed: Light = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, light);
    }
}
