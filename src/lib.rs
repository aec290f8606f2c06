//! Lenstrace sequential ray tracer
//!
//! Simulates light rays through an ordered sequence of spherical refracting
//! surfaces and a terminal output plane, for evaluating lens designs by
//! geometric ray tracing. Ships beam generators, an RMS spot-size metric, a
//! brute-force singlet optimizer and a PNG spot-diagram writer.

#![warn(missing_docs)]
#![warn(rustdoc::broken_intra_doc_links)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod aberration;
pub mod beam;
pub mod optimize;
pub mod output;
pub mod ray;
pub mod surface;
pub mod system;
