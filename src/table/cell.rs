use thiserror::Error;

use crate::model::structure::Cell;

/// Edge of the substitute cubic cell used when a structure carries no
/// box. Non-periodic systems still need bounds for neighbor search, so
/// the cell just has to comfortably exceed the structure's extent.
pub const DEFAULT_CELL_EDGE: f64 = 500.0;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum CellError {
    /// The triclinic conversion produced a non-real c edge
    /// (`c^2 - xz^2 - yz^2 < 0`). Non-physical lattice angles; fatal.
    #[error(
        "degenerate cell: a={a}, b={b}, c={c}, alpha={alpha}, beta={beta}, gamma={gamma} \
         give a non-real box height"
    )]
    DegenerateCell {
        a: f64,
        b: f64,
        c: f64,
        alpha: f64,
        beta: f64,
        gamma: f64,
    },
}

/// Simulation-cell representation: per-axis bounds plus tilt factors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriclinicBounds {
    pub xlo: f64,
    pub xhi: f64,
    pub ylo: f64,
    pub yhi: f64,
    pub zlo: f64,
    pub zhi: f64,
    pub xy: f64,
    pub xz: f64,
    pub yz: f64,
}

impl TriclinicBounds {
    /// Standard crystallographic-to-triclinic conversion with optional
    /// symmetric per-axis padding on both bounds.
    pub fn from_cell(cell: &Cell, padding: [f64; 3]) -> Result<Self, CellError> {
        let Cell {
            a,
            b,
            c,
            alpha,
            beta,
            gamma,
        } = *cell;
        let (alp, bet, gam) = (alpha.to_radians(), beta.to_radians(), gamma.to_radians());

        let xhi = a;
        let xy = b * gam.cos();
        let xz = c * bet.cos();
        let yhi = (b * b - xy * xy).sqrt();
        let yz = (b * c * alp.cos() - xy * xz) / yhi;
        let height_sq = c * c - xz * xz - yz * yz;
        if height_sq < 0.0 {
            return Err(CellError::DegenerateCell {
                a,
                b,
                c,
                alpha,
                beta,
                gamma,
            });
        }
        let zhi = height_sq.sqrt();

        Ok(Self {
            xlo: -padding[0],
            xhi: xhi + padding[0],
            ylo: -padding[1],
            yhi: yhi + padding[1],
            zlo: -padding[2],
            zhi: zhi + padding[2],
            xy,
            xz,
            yz,
        })
    }

    /// Large orthogonal cubic cell centered on the origin, used when the
    /// structure has no box. Never runs the triclinic formula.
    pub fn large_default() -> Self {
        let half = 0.5 * DEFAULT_CELL_EDGE;
        Self {
            xlo: -half,
            xhi: half,
            ylo: -half,
            yhi: half,
            zlo: -half,
            zhi: half,
            xy: 0.0,
            xz: 0.0,
            yz: 0.0,
        }
    }

    /// Reconstructed edge lengths (a, b, c) from the spans and tilts.
    pub fn edge_lengths(&self) -> [f64; 3] {
        let ly = self.yhi - self.ylo;
        let lz = self.zhi - self.zlo;
        [
            self.xhi - self.xlo,
            (ly * ly + self.xy * self.xy).sqrt(),
            (lz * lz + self.xz * self.xz + self.yz * self.yz).sqrt(),
        ]
    }

    /// Reconstructed lattice angles (alpha, beta, gamma) in degrees.
    pub fn cell_angles(&self) -> [f64; 3] {
        let [_, b, c] = self.edge_lengths();
        let ly = self.yhi - self.ylo;
        let cos_alpha = (self.xy * self.xz + ly * self.yz) / (b * c);
        let cos_beta = self.xz / c;
        let cos_gamma = self.xy / b;
        [
            cos_alpha.clamp(-1.0, 1.0).acos().to_degrees(),
            cos_beta.clamp(-1.0, 1.0).acos().to_degrees(),
            cos_gamma.clamp(-1.0, 1.0).acos().to_degrees(),
        ]
    }

    /// Fractional coordinates of a Cartesian position with respect to
    /// the (unpadded) triclinic vectors a=(lx,0,0), b=(xy,ly,0),
    /// c=(xz,yz,lz).
    pub fn fractional(&self, position: [f64; 3]) -> [f64; 3] {
        let lx = self.xhi - self.xlo;
        let ly = self.yhi - self.ylo;
        let lz = self.zhi - self.zlo;
        let fc = position[2] / lz;
        let fb = (position[1] - fc * self.yz) / ly;
        let fa = (position[0] - fb * self.xy - fc * self.xz) / lx;
        [fa, fb, fc]
    }
}
