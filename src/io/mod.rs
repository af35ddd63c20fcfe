// I/O module
// CSV export of the participant table

pub mod csv_format;

pub use csv_format::escribir_participantes_csv;
