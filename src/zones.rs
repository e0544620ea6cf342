//! Body zone groups treated together in one session.
//!
//! These are fixed configuration. Callers always receive owned copies so a
//! recommendation can be held or mutated without touching the static tables.

/// Monday: legs and glutes
pub const LOWER: &[&str] = &["Thighs", "Knees", "Glutes"];

/// Sunday: torso
pub const UPPER: &[&str] = &["Chest", "Abdomen"];

/// Appended to the torso session on shoulder weeks
pub const SHOULDER_ADDON: &[&str] = &["Shoulders", "Arms (Gradient)"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoneGroup {
  Lower,
  Upper,
  ShoulderAddon,
}

impl ZoneGroup {
  pub fn zones(self) -> &'static [&'static str] {
    match self {
      Self::Lower => LOWER,
      Self::Upper => UPPER,
      Self::ShoulderAddon => SHOULDER_ADDON,
    }
  }

  /// Owned copy of the group's zone names, in order
  pub fn to_vec(self) -> Vec<String> {
    self.zones().iter().map(|z| z.to_string()).collect()
  }

  pub fn contains(self, zone: &str) -> bool {
    self.zones().contains(&zone)
  }
}

/// Torso session zones: UPPER, plus SHOULDER_ADDON on shoulder weeks
pub fn torso_zones(with_shoulders: bool) -> Vec<String> {
  let mut zones = ZoneGroup::Upper.to_vec();
  if with_shoulders {
    zones.extend(ZoneGroup::ShoulderAddon.to_vec());
  }
  zones
}

/// Legs session zones
pub fn legs_zones() -> Vec<String> {
  ZoneGroup::Lower.to_vec()
}
