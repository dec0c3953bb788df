//! End-to-end scenarios across surface, spectrum and distance.
