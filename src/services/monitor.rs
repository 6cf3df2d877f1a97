// src/services/monitor.rs

use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
    time::Duration,
};

use chrono::{DateTime, Utc};

use crate::{
    common::{
        error::AppError,
        tiempo::{fecha_actual, hora_actual},
    },
    db::DashboardRepository,
    models::{
        conteo::Area,
        dashboard::{AlertaDesbalance, EstadoBalance},
        evento::EventoSistema,
    },
    services::{balance, event_bus::EventBus},
};

// O que uma avaliação de área produz sobre o registro de alertas
#[derive(Debug)]
pub(crate) enum Transicion {
    Entra(AlertaDesbalance),
    Sale(AlertaDesbalance),
    SinCambio,
}

// Aplica o heurístico sobre o registro: a alerta entra uma única vez por
// chave sucursal+área, e sai quando a área volta a ficar balanceada.
pub(crate) fn aplicar_transicion(
    alertas: &mut HashMap<String, AlertaDesbalance>,
    sucursal_id: &str,
    area: Area,
    conteos: &[i64],
    ahora: DateTime<Utc>,
) -> Transicion {
    let clave = format!("{sucursal_id}_{area}");
    let diferencia = balance::diferencia(conteos);

    match balance::clasificar(conteos) {
        EstadoBalance::Desbalanceado => {
            if alertas.contains_key(&clave) {
                return Transicion::SinCambio;
            }
            let alerta = AlertaDesbalance {
                id: clave.clone(),
                sucursal_id: sucursal_id.to_string(),
                area,
                diferencia,
                mensaje: format!(
                    "Desbalance en área {area}: diferencia de {diferencia} clientes"
                ),
                creada_en: ahora,
            };
            alertas.insert(clave, alerta.clone());
            Transicion::Entra(alerta)
        }
        EstadoBalance::Balanceado => match alertas.remove(&clave) {
            Some(alerta) => Transicion::Sale(alerta),
            None => Transicion::SinCambio,
        },
    }
}

/// Monitor de balance. Guarda as alertas ativas (estado próprio, atrás de um
/// RwLock) e roda em segundo plano: reavalia a sucursal de cada registro que
/// passa pelo canal de eventos, e a cada intervalo (~30s, o mesmo passo do
/// auto-refresh do painel) reavalia todas e publica um tique de `Refresco`.
pub struct BalanceMonitor {
    repo: DashboardRepository,
    bus: EventBus,
    alertas: RwLock<HashMap<String, AlertaDesbalance>>,
    intervalo: Duration,
}

impl BalanceMonitor {
    pub fn new(repo: DashboardRepository, bus: EventBus, intervalo: Duration) -> Self {
        Self {
            repo,
            bus,
            alertas: RwLock::new(HashMap::new()),
            intervalo,
        }
    }

    pub fn alertas_activas(&self) -> Vec<AlertaDesbalance> {
        let guardia = self.alertas.read().expect("lock de alertas envenenado");
        let mut lista: Vec<AlertaDesbalance> = guardia.values().cloned().collect();
        lista.sort_by(|a, b| b.creada_en.cmp(&a.creada_en));
        lista
    }

    pub async fn evaluar_sucursal(&self, sucursal_id: &str) -> Result<(), AppError> {
        let fecha = fecha_actual();
        let hora = hora_actual();
        let de_la_hora = self
            .repo
            .totales_por_caja_hora(fecha, &hora, Some(sucursal_id))
            .await?;

        let ahora = Utc::now();
        let mut publicables = Vec::new();

        for area in [Area::Medicina, Area::Autoservicio] {
            let conteos: Vec<i64> = area
                .cajas()
                .iter()
                .map(|&caja| {
                    de_la_hora
                        .iter()
                        .find(|f| f.caja == caja)
                        .map(|f| f.total)
                        .unwrap_or(0)
                })
                .collect();

            let transicion = {
                let mut guardia = self.alertas.write().expect("lock de alertas envenenado");
                aplicar_transicion(&mut guardia, sucursal_id, area, &conteos, ahora)
            };

            match transicion {
                Transicion::Entra(alerta) => {
                    tracing::warn!(
                        sucursal = %alerta.sucursal_id,
                        area = %alerta.area,
                        diferencia = alerta.diferencia,
                        "Área desbalanceada"
                    );
                    publicables.push(EventoSistema::Alerta(alerta));
                }
                Transicion::Sale(alerta) => {
                    tracing::info!(
                        sucursal = %alerta.sucursal_id,
                        area = %alerta.area,
                        "Área de vuelta en balance"
                    );
                    publicables.push(EventoSistema::AlertaResuelta {
                        id: alerta.id,
                        sucursal_id: alerta.sucursal_id,
                        area: alerta.area,
                        resuelta_en: ahora,
                    });
                }
                Transicion::SinCambio => {}
            }
        }

        for evento in publicables {
            self.bus.publicar(evento);
        }

        Ok(())
    }

    pub async fn evaluar_todas(&self) -> Result<(), AppError> {
        let sucursales = self.repo.sucursales().await?;
        for sucursal in sucursales {
            self.evaluar_sucursal(&sucursal.id).await?;
        }
        Ok(())
    }
}

// Dispara o laço do monitor em segundo plano
pub fn lanzar(monitor: Arc<BalanceMonitor>) {
    tokio::spawn(async move {
        let mut tick = tokio::time::interval(monitor.intervalo);
        let mut eventos = monitor.bus.suscribir();

        loop {
            tokio::select! {
                _ = tick.tick() => {
                    if let Err(e) = monitor.evaluar_todas().await {
                        tracing::warn!("Fallo al reevaluar el balance: {e}");
                    }
                    monitor.bus.publicar(EventoSistema::Refresco { marca: Utc::now() });
                }
                recibido = eventos.recv() => {
                    match recibido {
                        Ok(EventoSistema::Registro(registro)) => {
                            if let Err(e) = monitor.evaluar_sucursal(&registro.sucursal_id).await {
                                tracing::warn!(
                                    sucursal = %registro.sucursal_id,
                                    "Fallo al evaluar la sucursal: {e}"
                                );
                            }
                        }
                        // As próprias alertas e os tiques não realimentam o monitor
                        Ok(_) => {}
                        Err(tokio::sync::broadcast::error::RecvError::Lagged(saltados)) => {
                            tracing::warn!(saltados, "Monitor atrasado en el canal de eventos");
                        }
                        Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
                    }
                }
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ahora() -> DateTime<Utc> {
        Utc::now()
    }

    #[test]
    fn la_alerta_entra_una_sola_vez() {
        let mut alertas = HashMap::new();

        let primera =
            aplicar_transicion(&mut alertas, "sucursal_1", Area::Medicina, &[5, 2, 1], ahora());
        assert!(matches!(primera, Transicion::Entra(_)));
        assert_eq!(alertas.len(), 1);

        // mientras siga desbalanceada, nada nuevo
        let segunda =
            aplicar_transicion(&mut alertas, "sucursal_1", Area::Medicina, &[6, 2, 1], ahora());
        assert!(matches!(segunda, Transicion::SinCambio));
        assert_eq!(alertas.len(), 1);
    }

    #[test]
    fn la_alerta_sale_al_volver_al_balance() {
        let mut alertas = HashMap::new();
        aplicar_transicion(&mut alertas, "sucursal_1", Area::Autoservicio, &[5, 2, 1], ahora());
        assert_eq!(alertas.len(), 1);

        let salida =
            aplicar_transicion(&mut alertas, "sucursal_1", Area::Autoservicio, &[3, 3, 4], ahora());
        assert!(matches!(salida, Transicion::Sale(_)));
        assert!(alertas.is_empty());

        // balanceada y sin alerta previa: sin cambio
        let quieta =
            aplicar_transicion(&mut alertas, "sucursal_1", Area::Autoservicio, &[3, 3, 4], ahora());
        assert!(matches!(quieta, Transicion::SinCambio));
    }

    #[test]
    fn cada_sucursal_y_area_tiene_su_clave() {
        let mut alertas = HashMap::new();
        aplicar_transicion(&mut alertas, "sucursal_1", Area::Medicina, &[5, 2, 1], ahora());
        aplicar_transicion(&mut alertas, "sucursal_2", Area::Medicina, &[9, 0, 0], ahora());
        aplicar_transicion(&mut alertas, "sucursal_1", Area::Autoservicio, &[4, 0, 0], ahora());

        assert_eq!(alertas.len(), 3);
        assert!(alertas.contains_key("sucursal_1_medicina"));
        assert!(alertas.contains_key("sucursal_2_medicina"));
        assert!(alertas.contains_key("sucursal_1_autoservicio"));
    }

    #[test]
    fn el_mensaje_lleva_la_diferencia() {
        let mut alertas = HashMap::new();
        let transicion =
            aplicar_transicion(&mut alertas, "sucursal_1", Area::Medicina, &[5, 2, 1], ahora());

        match transicion {
            Transicion::Entra(alerta) => {
                assert_eq!(alerta.diferencia, 4);
                assert_eq!(
                    alerta.mensaje,
                    "Desbalance en área medicina: diferencia de 4 clientes"
                );
            }
            otra => panic!("se esperaba Entra, llegó {otra:?}"),
        }
    }
}
