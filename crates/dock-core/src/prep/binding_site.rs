use crate::core::io::pdb::PdbStructure;
use crate::core::models::job::SearchBox;
use nalgebra::{Point3, Vector3};

/// Default edge length of the search box along every axis, in Angstroms.
pub const DEFAULT_BOX_EDGE: f64 = 60.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BoxCenter {
    Explicit(Point3<f64>),
    /// Geometric center of every atom in the receptor.
    Centroid,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BindingSite {
    pub center: BoxCenter,
    pub size: Vector3<f64>,
}

impl Default for BindingSite {
    fn default() -> Self {
        Self::new(BoxCenter::Centroid, Vector3::repeat(DEFAULT_BOX_EDGE))
    }
}

impl BindingSite {
    pub fn new(center: BoxCenter, size: Vector3<f64>) -> Self {
        Self { center, size }
    }

    pub fn resolve(&self, structure: &PdbStructure) -> SearchBox {
        let center = match self.center {
            BoxCenter::Explicit(point) => point,
            BoxCenter::Centroid => structure.centroid(),
        };
        SearchBox::new(center, self.size)
    }
}
