//! One-dimensional radial FEM mesh and the implicit transient step.

use libm::fabsf;

use crate::banded::Tridiag;
use crate::params::SimParams;
use crate::quadrature;

/// External supervisory timer. Assembly and solve are slow enough on a small
/// core that the supervisor must be acknowledged mid-step, not just once per
/// host-loop tick: `reset` is called at every quadrature point and once more
/// after the solve.
pub trait Liveness {
    fn reset(&mut self);
}

/// No-op acknowledgement for hosts without a supervisor.
pub struct NoSupervisor;

impl Liveness for NoSupervisor {
    fn reset(&mut self) {}
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SolverError {
    /// Fewer than two nodes leaves no element to integrate over.
    TooFewNodes,
    /// Element size is a divisor and must be strictly positive.
    ElementSizeNotPositive,
    /// The time step is a divisor and must be strictly positive.
    TimeStepNotPositive,
    /// Two adjacent nodes coincide.
    DegenerateElement,
    /// The integration scheme parameter is not a valid table index.
    BadScheme,
    /// The assembled system could not be factored.
    Singular,
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Node {
    /// Radial position m
    pub r: f32,
    /// Temperature degC
    pub t: f32,
}

/// `N` nodes joined by `N - 1` linear elements along the radius.
#[derive(Debug, Clone)]
pub struct ThermalMesh<const N: usize> {
    pub nodes: [Node; N],
}

impl<const N: usize> ThermalMesh<N> {
    pub fn new() -> Self {
        Self {
            nodes: [Node { r: 0.0, t: 0.0 }; N],
        }
    }

    /// Lays the nodes out at radii 0, h, 2h, ... with every temperature set to
    /// `t0`.
    pub fn generate(&mut self, t0: f32, elem_size: f32) -> Result<(), SolverError> {
        if N < 2 {
            return Err(SolverError::TooFewNodes);
        }
        if !(elem_size > 0.0) {
            return Err(SolverError::ElementSizeNotPositive);
        }

        let mut r = 0.0;
        for node in self.nodes.iter_mut() {
            node.t = t0;
            node.r = r;
            r += elem_size;
        }
        Ok(())
    }

    /// One implicit transient step of length `d_tau`.
    ///
    /// Assembles conduction and capacitance contributions element by element
    /// with Gauss-Legendre quadrature, adds the convective loss to ambient on
    /// the outer boundary, then factors the tridiagonal system and replaces
    /// the nodal temperatures with the solution.
    pub fn step<W: Liveness>(
        &mut self,
        d_tau: f32,
        r_max: f32,
        t_ambient: f32,
        params: &SimParams,
        supervisor: &mut W,
    ) -> Result<(), SolverError> {
        if N < 2 {
            return Err(SolverError::TooFewNodes);
        }
        if !(d_tau > 0.0) {
            return Err(SolverError::TimeStepNotPositive);
        }
        let scheme = params.integration_scheme;
        if !(scheme >= 0.0 && scheme <= quadrature::MAX_SCHEME as f32) {
            return Err(SolverError::BadScheme);
        }
        let int_points =
            quadrature::points(scheme as usize).ok_or(SolverError::BadScheme)?;

        let mut h = Tridiag::<N>::zeroed();
        let mut p = [0.0f32; N];

        for i in 0..N - 1 {
            let node_i = self.nodes[i];
            let node_j = self.nodes[i + 1];

            let d_r = fabsf(node_i.r - node_j.r);
            if d_r == 0.0 {
                return Err(SolverError::DegenerateElement);
            }

            // Convective loss applies on the outermost element only
            let alpha_air = if i == N - 2 { params.convection } else { 0.0 };

            let mut h_local = [[0.0f32; 2]; 2];
            let mut p_local = [0.0f32; 2];

            for point in int_points {
                let n0 = 0.5 * (1.0 - point.xi);
                let n1 = 0.5 * (1.0 + point.xi);

                let r = node_i.r * n0 + node_j.r * n1;
                let t = node_i.t * n0 + node_j.t * n1;

                let cond = params.conductivity * r * point.weight / d_r;
                let cap = params.specific_heat * params.density * d_r * r * point.weight;

                h_local[0][0] += cond + cap * n0 * n0 / d_tau;
                h_local[0][1] += -cond + cap * n0 * n1 / d_tau;
                h_local[1][0] = h_local[0][1];
                h_local[1][1] += cond + cap * n1 * n1 / d_tau + 2.0 * alpha_air * r_max;

                p_local[0] += cap * t * n0 / d_tau;
                p_local[1] += cap * t * n1 / d_tau + 2.0 * alpha_air * r_max * t_ambient;

                supervisor.reset();
            }

            h.accumulate_block(i, &h_local);
            p[i] += p_local[0];
            p[i + 1] += p_local[1];
        }

        let t_new = h.solve(&p).map_err(|_| SolverError::Singular)?;
        supervisor.reset();

        for (node, t) in self.nodes.iter_mut().zip(t_new.iter()) {
            node.t = *t;
        }
        Ok(())
    }
}

impl<const N: usize> Default for ThermalMesh<N> {
    fn default() -> Self {
        Self::new()
    }
}
