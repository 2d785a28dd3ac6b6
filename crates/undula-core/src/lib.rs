//! # Undula Core
//!
//! The numerical backbone of the Undula framework. This crate advances
//! Maxwell's curl equations in time on a staggered Cartesian grid (the Yee
//! lattice) for the transverse-magnetic polarisation, in which the only
//! non-trivial electric component is out-of-plane ($E_z$) and the magnetic
//! components are in-plane ($H_x$, $H_y$).
//!
//! ## Architecture
//!
//! A simulation is assembled from a [`config::Config`] (grid and time
//! discretisation), a [`mesh::MeshSet`] (material maps, immutable during the
//! run), and a list of [`source::Source`] excitations. The
//! [`engine::Engine`] drives the [`stepper::Stepper`] over every time stamp
//! and records the $E_z$ snapshot of each step into a caller-allocated
//! 3-D array.
//!
//! Geometry rasterisation and figure rendering are external collaborators:
//! they contribute the material arrays consumed here and plot the recording
//! produced here, nothing more.
//!
//! ## Modules
//!
//! - [`physics`] — SI constants and the Courant stability bound.
//! - [`config`] — Grid/time parameters and the step cursor.
//! - [`mesh`] — Permittivity, nonlinearity, and PML conductivity maps.
//! - [`pml`] — Polynomial-ramp conductivity profiles for the absorbing bands.
//! - [`fields`] — The mutable $E_z$/$H_x$/$H_y$ working state.
//! - [`source`] — Continuous multi-wavelength and Gaussian-impulse sources.
//! - [`stepper`] — The Yee update kernels (the hot path).
//! - [`engine`] — The stepping loop, validation, and recording.
//! - [`detector`] — Point probes over a finished recording.
//! - [`error`] — Error types surfaced at the engine boundary.

pub mod config;
pub mod detector;
pub mod engine;
pub mod error;
pub mod fields;
pub mod mesh;
pub mod physics;
pub mod pml;
pub mod source;
pub mod stepper;
