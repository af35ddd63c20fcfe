use crate::rate::{URL_PRIMARIA, URL_SECUNDARIA};
use crate::types::FormaPago;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use std::path::PathBuf;

/// Manage event registrations, payments and the BCV exchange rate
#[derive(Parser, Debug)]
#[command(name = "congreso")]
#[command(about = "Gestión de inscripciones y pagos del congreso", long_about = None)]
pub struct CliArgs {
    /// JSON data file holding the "participantes" collection
    #[arg(
        long = "data",
        value_name = "ARCHIVO",
        env = "CONGRESO_DATA",
        default_value = "participantes.json"
    )]
    pub data: PathBuf,

    /// Fixed per-participant fee in base currency
    #[arg(
        long = "cuota",
        value_name = "MONTO",
        env = "CONGRESO_CUOTA",
        default_value = "8"
    )]
    pub cuota: Decimal,

    /// Primary rate-source endpoint
    #[arg(
        long = "tasa-primaria-url",
        value_name = "URL",
        env = "TASA_PRIMARIA_URL",
        default_value = URL_PRIMARIA,
        hide_default_value = true
    )]
    pub tasa_primaria_url: String,

    /// Secondary rate-source endpoint
    #[arg(
        long = "tasa-secundaria-url",
        value_name = "URL",
        env = "TASA_SECUNDARIA_URL",
        default_value = URL_SECUNDARIA,
        hide_default_value = true
    )]
    pub tasa_secundaria_url: String,

    #[command(subcommand)]
    pub comando: Comando,
}

#[derive(Subcommand, Debug)]
pub enum Comando {
    /// Registrar un participante nuevo
    Registrar(RegistrarArgs),

    /// Editar un participante existente
    Editar(EditarArgs),

    /// Eliminar un participante (inmediato e irreversible)
    Eliminar {
        /// Id del participante
        id: String,
    },

    /// Listar participantes registrados
    Listar {
        /// Filtro por nombre, apellido o cédula
        #[arg(long, value_name = "TEXTO")]
        filtro: Option<String>,

        /// Exportar como CSV en lugar de tabla
        #[arg(long)]
        csv: bool,
    },

    /// Reporte financiero del congreso
    Reporte,

    /// Consultar la tasa de cambio BCV
    Tasa {
        /// Fijar una tasa manual para la sesión
        #[arg(long, value_name = "VALOR")]
        manual: Option<Decimal>,
    },
}

/// Fields for a new registration
#[derive(Args, Debug)]
pub struct RegistrarArgs {
    #[arg(long)]
    pub nombre: String,

    #[arg(long)]
    pub apellido: String,

    /// Cédula (solo números)
    #[arg(long)]
    pub cedula: String,

    #[arg(long)]
    pub telefono: String,

    #[arg(long = "fecha-nacimiento", value_name = "AAAA-MM-DD")]
    pub fecha_nacimiento: Option<NaiveDate>,

    #[arg(long)]
    pub miembro: bool,

    #[arg(long)]
    pub bautizado: bool,

    /// Exento de pago (anula monto y forma de pago)
    #[arg(long)]
    pub exento: bool,

    /// Primer abono en dólares
    #[arg(long, value_name = "MONTO", default_value = "0")]
    pub monto: Decimal,

    #[arg(long = "forma-pago", value_enum)]
    pub forma_pago: Option<FormaPago>,

    /// Número de referencia (pago móvil)
    #[arg(long)]
    pub referencia: Option<String>,

    /// Número de confirmación o titular (Zelle)
    #[arg(long = "zelle-info")]
    pub zelle_info: Option<String>,

    /// Segundo abono simultáneo en dólares
    #[arg(long = "monto2", value_name = "MONTO")]
    pub monto2: Option<Decimal>,

    #[arg(long = "segunda-forma-pago", value_enum)]
    pub segunda_forma_pago: Option<FormaPago>,

    #[arg(long)]
    pub referencia2: Option<String>,

    #[arg(long = "zelle-info2")]
    pub zelle_info2: Option<String>,

    /// Correo del usuario que registra
    #[arg(long = "registrado-por", env = "CONGRESO_USUARIO")]
    pub registrado_por: String,
}

/// Fields for an edit; omitted fields keep their stored value
#[derive(Args, Debug)]
pub struct EditarArgs {
    /// Id del participante
    pub id: String,

    #[arg(long)]
    pub nombre: Option<String>,

    #[arg(long)]
    pub apellido: Option<String>,

    #[arg(long)]
    pub cedula: Option<String>,

    #[arg(long)]
    pub telefono: Option<String>,

    #[arg(long = "fecha-nacimiento", value_name = "AAAA-MM-DD")]
    pub fecha_nacimiento: Option<NaiveDate>,

    #[arg(long, value_name = "BOOL")]
    pub miembro: Option<bool>,

    #[arg(long, value_name = "BOOL")]
    pub bautizado: Option<bool>,

    #[arg(long, value_name = "BOOL")]
    pub exento: Option<bool>,

    /// Nuevo monto acumulado en dólares (no un delta)
    #[arg(long, value_name = "MONTO")]
    pub monto: Option<Decimal>,

    #[arg(long = "forma-pago", value_enum)]
    pub forma_pago: Option<FormaPago>,

    #[arg(long)]
    pub referencia: Option<String>,

    #[arg(long = "zelle-info")]
    pub zelle_info: Option<String>,

    #[arg(long = "segunda-forma-pago", value_enum)]
    pub segunda_forma_pago: Option<FormaPago>,

    #[arg(long)]
    pub referencia2: Option<String>,

    #[arg(long = "zelle-info2")]
    pub zelle_info2: Option<String>,
}
