//! Fixed DH link geometry of the arm.

use crate::types::{LinkParameters, JOINT_COUNT};
use crate::{ArmkinError, Result};
use std::f64::consts::FRAC_PI_2;
use std::str::FromStr;

/// Geometry of the stock six-axis arm, base to tip.
pub const DEFAULT_LINKS: [LinkParameters; JOINT_COUNT] = [
    LinkParameters::new(0.0, 0.21, FRAC_PI_2),
    LinkParameters::new(-0.8, 0.193, 0.0),
    LinkParameters::new(-0.598, -0.16, 0.0),
    LinkParameters::new(0.0, 0.25, FRAC_PI_2),
    LinkParameters::new(0.0, 0.25, -FRAC_PI_2),
    LinkParameters::new(0.0, 0.25, 0.0),
];

/// Ordered link table. Index `i` is the `i`-th joint counted from the base.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinkGeometry {
    links: [LinkParameters; JOINT_COUNT],
}

impl LinkGeometry {
    pub const fn new(links: [LinkParameters; JOINT_COUNT]) -> Self {
        Self { links }
    }

    /// DH parameters of one joint.
    pub fn geometry(&self, joint_index: usize) -> Result<LinkParameters> {
        self.links
            .get(joint_index)
            .copied()
            .ok_or(ArmkinError::OutOfRange {
                index: joint_index,
                len: self.links.len(),
            })
    }

    pub const fn len(&self) -> usize {
        JOINT_COUNT
    }

    pub const fn is_empty(&self) -> bool {
        false
    }

    pub fn links(&self) -> &[LinkParameters; JOINT_COUNT] {
        &self.links
    }
}

impl Default for LinkGeometry {
    fn default() -> Self {
        Self::new(DEFAULT_LINKS)
    }
}

/// Parses six `a,d,alpha` triples separated by `;`, e.g.
/// `0,0.21,1.5708; -0.8,0.193,0; ...`. Alpha is in radians.
impl FromStr for LinkGeometry {
    type Err = ArmkinError;

    fn from_str(s: &str) -> Result<Self> {
        let entries: Vec<&str> = s
            .split(';')
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .collect();

        if entries.len() != JOINT_COUNT {
            return Err(ArmkinError::InvalidGeometry(format!(
                "expected {} links, got {}",
                JOINT_COUNT,
                entries.len()
            )));
        }

        let mut links = DEFAULT_LINKS;
        for (i, entry) in entries.iter().enumerate() {
            let values = entry
                .split(',')
                .map(|v| v.trim().parse::<f64>())
                .collect::<std::result::Result<Vec<f64>, _>>()
                .map_err(|e| ArmkinError::InvalidGeometry(format!("link {}: {}", i, e)))?;

            let [a, d, alpha] = values.as_slice() else {
                return Err(ArmkinError::InvalidGeometry(format!(
                    "link {}: expected 3 values (a,d,alpha), got {}",
                    i,
                    values.len()
                )));
            };
            links[i] = LinkParameters::new(*a, *d, *alpha);
        }

        Ok(Self::new(links))
    }
}
