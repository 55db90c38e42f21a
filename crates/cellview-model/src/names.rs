//! Selection-engine dimension names.
//!
//! Every dimension lives in a namespace so that an observation field and a
//! gene with the same name never collide.

pub fn obs_annotation_dimension(field: &str) -> String {
    format!("obs/{field}")
}

pub fn layout_dimension(name: &str) -> String {
    format!("layout/{name}")
}

pub fn diffexp_dimension(gene: &str) -> String {
    format!("diffexp/{gene}")
}

pub fn user_defined_dimension(gene: &str) -> String {
    format!("userGene/{gene}")
}
