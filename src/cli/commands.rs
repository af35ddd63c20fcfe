//! Command handlers
//!
//! Each subcommand maps to one handler that wires the validator, the
//! ledger, the rate provider and the store together. Handlers own the
//! operator-facing output; the core modules stay print-free.

use crate::core::{
    aplicar_pago, capitalizar_palabras, clasificar_participante, resumir, validar, SolicitudPago,
};
use crate::io::escribir_participantes_csv;
use crate::rate::{Cotizacion, FuenteDolarApi, FuentePyDolarVe, ProveedorTasa};
use crate::store::{AlmacenArchivoJson, AlmacenParticipantes};
use crate::types::{FormaPago, Participante, RegistroError};
use rust_decimal::Decimal;
use tracing::info;

use super::args::{CliArgs, Comando, EditarArgs, RegistrarArgs};

/// Run the parsed command against the configured data file
pub async fn ejecutar(args: CliArgs) -> Result<(), RegistroError> {
    let almacen = AlmacenArchivoJson::abrir(&args.data).await?;

    let client = reqwest::Client::new();
    let tasas = ProveedorTasa::new(vec![
        Box::new(FuentePyDolarVe::new(client.clone(), &args.tasa_primaria_url)),
        Box::new(FuenteDolarApi::new(client, &args.tasa_secundaria_url)),
    ]);

    match args.comando {
        Comando::Registrar(registro) => registrar(&almacen, &tasas, args.cuota, registro).await,
        Comando::Editar(edicion) => editar(&almacen, &tasas, args.cuota, edicion).await,
        Comando::Eliminar { id } => eliminar(&almacen, &id).await,
        Comando::Listar { filtro, csv } => listar(&almacen, args.cuota, filtro, csv).await,
        Comando::Reporte => reporte(&almacen, &tasas, args.cuota).await,
        Comando::Tasa { manual } => tasa(&tasas, manual).await,
    }
}

fn mostrar_cotizacion(cotizacion: Option<Cotizacion>) {
    match cotizacion {
        Some(c) => println!(
            "Tasa BCV: Bs. {} (fuente: {})",
            c.valor.round_dp(2),
            c.origen
        ),
        None => println!("Tasa BCV: No disponible"),
    }
}

async fn registrar(
    almacen: &dyn AlmacenParticipantes,
    tasas: &ProveedorTasa,
    cuota: Decimal,
    args: RegistrarArgs,
) -> Result<(), RegistroError> {
    let mut participante = Participante::nuevo(
        &capitalizar_palabras(&args.nombre),
        &capitalizar_palabras(&args.apellido),
        args.cedula.trim(),
        &args.telefono,
        args.fecha_nacimiento,
        &args.registrado_por,
    );
    participante.miembro = args.miembro;
    participante.bautizado = args.bautizado;

    // Uniqueness validation and the display rate are independent
    // external calls; neither is allowed to block the other
    let (validacion, cotizacion) = tokio::join!(
        validar(almacen, &participante, None, true),
        tasas.obtener_tasa()
    );
    validacion?.en_resultado()?;
    mostrar_cotizacion(cotizacion);

    let solicitud = SolicitudPago {
        monto: args.monto,
        monto2: args.monto2,
        forma_pago: args.forma_pago,
        referencia: args.referencia.unwrap_or_default(),
        zelle_info: args.zelle_info.unwrap_or_default(),
        segunda_forma_pago: args.segunda_forma_pago,
        referencia2: args.referencia2.unwrap_or_default(),
        zelle_info2: args.zelle_info2.unwrap_or_default(),
        exento: args.exento,
    };

    let participante = aplicar_pago(&participante, &solicitud, cuota, tasas).await?;
    let creado = almacen.crear(participante).await?;

    info!(id = %creado.id, cedula = %creado.cedula, "participante registrado");
    let estado = clasificar_participante(&creado, cuota)?;
    println!(
        "Participante registrado: {} {} (cédula {}, id {})",
        creado.nombre, creado.apellido, creado.cedula, creado.id
    );
    println!(
        "Estado: {} | Monto pagado: ${}",
        estado.etiqueta(),
        creado.monto_pagado.round_dp(2)
    );
    Ok(())
}

async fn editar(
    almacen: &dyn AlmacenParticipantes,
    tasas: &ProveedorTasa,
    cuota: Decimal,
    args: EditarArgs,
) -> Result<(), RegistroError> {
    let actual = almacen
        .por_id(&args.id)
        .await?
        .ok_or_else(|| RegistroError::no_encontrado(&args.id))?;

    // The edit screen submits the full field set; omitted flags keep the
    // stored value, like a pre-filled form
    let mut editado = actual.clone();
    if let Some(nombre) = &args.nombre {
        editado.nombre = capitalizar_palabras(nombre);
    }
    if let Some(apellido) = &args.apellido {
        editado.apellido = capitalizar_palabras(apellido);
    }
    if let Some(cedula) = &args.cedula {
        editado.cedula = cedula.trim().to_string();
    }
    if let Some(telefono) = &args.telefono {
        editado.telefono = telefono.clone();
    }
    if let Some(fecha) = args.fecha_nacimiento {
        editado.fecha_nacimiento = Some(fecha);
    }
    if let Some(miembro) = args.miembro {
        editado.miembro = miembro;
    }
    if let Some(bautizado) = args.bautizado {
        editado.bautizado = bautizado;
    }

    validar(almacen, &editado, Some(&args.id), false)
        .await?
        .en_resultado()?;

    // A stored "Exento" method never pre-fills the form's selector
    let forma_previa = actual.forma_pago.filter(|f| *f != FormaPago::Exento);
    let segunda_previa = actual
        .segunda_forma_pago
        .filter(|f| *f != FormaPago::Exento);

    // Legacy paid-without-amount records pre-fill at the full fee so a
    // save without --monto keeps them satisfied
    let monto_actual = if actual.pago && actual.monto_pagado.is_zero() {
        cuota
    } else {
        actual.monto_pagado
    };

    let solicitud = SolicitudPago {
        monto: args.monto.unwrap_or(monto_actual),
        monto2: None,
        forma_pago: args.forma_pago.or(forma_previa),
        referencia: args.referencia.unwrap_or_else(|| actual.referencia.clone()),
        zelle_info: args.zelle_info.unwrap_or_else(|| actual.zelle_info.clone()),
        segunda_forma_pago: args.segunda_forma_pago.or(segunda_previa),
        referencia2: args
            .referencia2
            .unwrap_or_else(|| actual.referencia2.clone()),
        zelle_info2: args
            .zelle_info2
            .unwrap_or_else(|| actual.zelle_info2.clone()),
        exento: args.exento.unwrap_or(actual.exento),
    };

    let actualizado = aplicar_pago(&editado, &solicitud, cuota, tasas).await?;
    almacen.actualizar(&actualizado).await?;

    info!(id = %actualizado.id, "participante actualizado");
    let estado = clasificar_participante(&actualizado, cuota)?;
    println!(
        "Participante actualizado: {} {} | Estado: {} | Monto pagado: ${}",
        actualizado.nombre,
        actualizado.apellido,
        estado.etiqueta(),
        actualizado.monto_pagado.round_dp(2)
    );
    if actualizado.historial_pagos.len() > actual.historial_pagos.len() {
        println!(
            "Abono registrado a la tasa Bs. {}",
            actualizado.tasa_bcv_pago.round_dp(2)
        );
    }
    Ok(())
}

async fn eliminar(almacen: &dyn AlmacenParticipantes, id: &str) -> Result<(), RegistroError> {
    almacen.eliminar(id).await?;
    info!(%id, "participante eliminado");
    println!("Participante eliminado: {}", id);
    Ok(())
}

async fn listar(
    almacen: &dyn AlmacenParticipantes,
    cuota: Decimal,
    filtro: Option<String>,
    csv: bool,
) -> Result<(), RegistroError> {
    let mut participantes = almacen.todos().await?;
    if let Some(filtro) = &filtro {
        participantes.retain(|p| p.coincide_filtro(filtro));
    }
    participantes.sort_by(|a, b| (&a.apellido, &a.nombre).cmp(&(&b.apellido, &b.nombre)));

    if csv {
        return escribir_participantes_csv(&participantes, cuota, &mut std::io::stdout());
    }

    for p in &participantes {
        let estado = clasificar_participante(p, cuota)?;
        let forma = match (p.forma_pago, p.segunda_forma_pago) {
            (Some(primera), Some(segunda)) => format!("{} / {}", primera, segunda),
            (Some(primera), None) => primera.to_string(),
            _ => "-".to_string(),
        };
        let edad = p
            .edad
            .map(|e| e.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<30} {:<12} {:<14} {:>4}  {:<9} {}",
            format!("{} {}", p.nombre, p.apellido),
            p.cedula,
            p.telefono,
            edad,
            estado.etiqueta(),
            forma
        );
    }
    println!("Total participantes: {}", participantes.len());
    Ok(())
}

async fn reporte(
    almacen: &dyn AlmacenParticipantes,
    tasas: &ProveedorTasa,
    cuota: Decimal,
) -> Result<(), RegistroError> {
    // The collection read and the rate fetch are independent
    let (participantes, cotizacion) = tokio::join!(almacen.todos(), tasas.obtener_tasa());
    let participantes = participantes?;

    let resumen = resumir(&participantes, cuota, cotizacion.map(|c| c.valor))?;

    let en_bs = |usd: Decimal| match resumen.tasa {
        Some(tasa) => format!("(Bs. {})", (usd * tasa).round_dp(2)),
        None => "(Bs. no disponible)".to_string(),
    };

    println!("Reporte Financiero del Congreso");
    println!("Participantes inscritos: {}", resumen.total_participantes);
    println!("Pagados: {}", resumen.conteo.pagados());
    println!(
        "Pendientes: {} ({} sin abono, {} con abono parcial)",
        resumen.conteo.pendientes(),
        resumen.conteo.pendientes_totales,
        resumen.conteo.abonos_parciales
    );
    println!("Exentos: {}", resumen.conteo.exentos);
    mostrar_cotizacion(cotizacion);
    println!(
        "Monto recaudado: ${} {}",
        resumen.usd.recaudado.round_dp(2),
        en_bs(resumen.usd.recaudado)
    );
    println!(
        "Monto pendiente: ${} {}",
        resumen.usd.pendiente.round_dp(2),
        en_bs(resumen.usd.pendiente)
    );
    println!(
        "Total potencial: ${} {}",
        resumen.usd.potencial.round_dp(2),
        en_bs(resumen.usd.potencial)
    );
    println!(
        "Excedentes: ${} {}",
        resumen.usd.excedente.round_dp(2),
        en_bs(resumen.usd.excedente)
    );
    println!(
        "Déficit por exenciones: ${} {}",
        resumen.usd.deficit_exentos.round_dp(2),
        en_bs(resumen.usd.deficit_exentos)
    );
    Ok(())
}

async fn tasa(tasas: &ProveedorTasa, manual: Option<Decimal>) -> Result<(), RegistroError> {
    if let Some(valor) = manual {
        tasas
            .fijar_manual(valor)
            .await
            .map_err(|e| RegistroError::tasa(e.to_string()))?;
        println!("Tasa manual fijada para la sesión: Bs. {}", valor);
        return Ok(());
    }

    match tasas.obtener_tasa().await {
        Some(c) => mostrar_cotizacion(Some(c)),
        None => {
            mostrar_cotizacion(None);
            println!("Ingrese una tasa manual con: congreso tasa --manual <valor>");
        }
    }
    Ok(())
}
