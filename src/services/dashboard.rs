// src/services/dashboard.rs

use chrono::Utc;

use crate::{
    common::{
        error::AppError,
        tiempo::{fecha_actual, hora_actual, horas_del_dia},
    },
    db::DashboardRepository,
    models::{
        conteo::{Area, CAJA_MAX, CAJA_MIN},
        dashboard::{
            CajaDetalle, CajaTotal, DistribucionAreas, EstadoBalance, NivelActividad, PuntoHora,
            ResumenGeneral, SucursalDetalle, SucursalResumen, VistaArea,
        },
    },
    services::balance,
};

// As agregações do painel admin. O repositório devolve só as linhas com
// movimento; aqui os buracos viram zeros para as vistas sempre mostrarem as
// seis cajas e as 24 horas.
#[derive(Clone)]
pub struct DashboardService {
    repo: DashboardRepository,
}

impl DashboardService {
    pub fn new(repo: DashboardRepository) -> Self {
        Self { repo }
    }

    // Os cards do topo: total do dia, sucursales ativas e hora pico
    pub async fn resumen_general(
        &self,
        sucursal_id: Option<&str>,
    ) -> Result<ResumenGeneral, AppError> {
        let fecha = fecha_actual();

        let total_clientes = self.repo.total_del_dia(fecha, sucursal_id).await?;
        let sucursales_activas = self.repo.sucursales().await?.len() as i64;
        let pico = self.repo.hora_pico(fecha, sucursal_id).await?;

        let (hora_pico, clientes_hora_pico) = match pico {
            Some((hora, total)) if total > 0 => (Some(hora), total),
            _ => (None, 0),
        };

        Ok(ResumenGeneral {
            total_clientes,
            sucursales_activas,
            hora_pico,
            clientes_hora_pico,
            ultima_actualizacion: Utc::now(),
        })
    }

    /// A gráfica de área: totais do dia por caja da área escolhida, mais o
    /// estado de balance calculado sobre os contadores da hora atual.
    pub async fn vista_area(
        &self,
        area: Area,
        sucursal_id: Option<&str>,
    ) -> Result<VistaArea, AppError> {
        let fecha = fecha_actual();

        let del_dia = self.repo.totales_por_caja(fecha, sucursal_id).await?;
        let cajas = rellenar_area(&del_dia, area);
        let total: i64 = cajas.iter().map(|c| c.total).sum();
        let promedio_por_caja = balance::promedio_por_caja(&cajas);

        let hora = hora_actual();
        let de_la_hora = self
            .repo
            .totales_por_caja_hora(fecha, &hora, sucursal_id)
            .await?;
        let conteos_hora: Vec<i64> = rellenar_area(&de_la_hora, area)
            .iter()
            .map(|c| c.total)
            .collect();

        Ok(VistaArea {
            area,
            cajas,
            total,
            promedio_por_caja,
            estado: balance::clasificar(&conteos_hora),
            diferencia: balance::diferencia(&conteos_hora),
        })
    }

    // A grade de cards, uma entrada por sucursal
    pub async fn cuadricula(&self) -> Result<Vec<SucursalResumen>, AppError> {
        let fecha = fecha_actual();
        let hora = hora_actual();
        let sucursales = self.repo.sucursales().await?;

        let mut cards = Vec::with_capacity(sucursales.len());
        for sucursal in sucursales {
            let del_dia = self.repo.totales_por_caja(fecha, Some(&sucursal.id)).await?;
            let de_la_hora = self
                .repo
                .totales_por_caja_hora(fecha, &hora, Some(&sucursal.id))
                .await?;

            let total_clientes: i64 = del_dia.iter().map(|c| c.total).sum();
            let total_medicina: i64 = del_dia
                .iter()
                .filter(|c| Area::de_caja(c.caja) == Area::Medicina)
                .map(|c| c.total)
                .sum();
            let total_autoservicio = total_clientes - total_medicina;

            let cajas_hora_actual: Vec<i64> = rellenar_cajas(&de_la_hora)
                .iter()
                .map(|c| c.total)
                .collect();

            // Desbalanceada se qualquer uma das duas áreas estiver
            let desbalanceada = [Area::Medicina, Area::Autoservicio].iter().any(|area| {
                let conteos: Vec<i64> = rellenar_area(&de_la_hora, *area)
                    .iter()
                    .map(|c| c.total)
                    .collect();
                balance::clasificar(&conteos) == EstadoBalance::Desbalanceado
            });

            cards.push(SucursalResumen {
                id: sucursal.id,
                nombre: sucursal.nombre,
                total_clientes,
                total_medicina,
                total_autoservicio,
                cajas_hora_actual,
                desbalanceada,
                ultima_actualizacion: sucursal.ultima_actualizacion,
            });
        }

        Ok(cards)
    }

    // O modal de detalhe de uma sucursal
    pub async fn detalle(&self, sucursal_id: &str) -> Result<SucursalDetalle, AppError> {
        let fecha = fecha_actual();
        let sucursal = self
            .repo
            .sucursal(sucursal_id)
            .await?
            .ok_or(AppError::SucursalNoEncontrada)?;

        let del_dia = self.repo.totales_por_caja(fecha, Some(sucursal_id)).await?;
        let total_clientes: i64 = del_dia.iter().map(|c| c.total).sum();

        let cajas = rellenar_cajas(&del_dia)
            .into_iter()
            .map(|c| CajaDetalle {
                caja: c.caja,
                area: Area::de_caja(c.caja),
                total: c.total,
                nivel: NivelActividad::de_total(c.total),
            })
            .collect();

        // Série de 24 baldes, com zero nas horas sem movimento
        let con_datos = self.repo.serie_por_hora(fecha, sucursal_id).await?;
        let por_hora = horas_del_dia()
            .into_iter()
            .map(|hora| {
                let total = con_datos
                    .iter()
                    .find(|p| p.hora == hora)
                    .map(|p| p.total)
                    .unwrap_or(0);
                PuntoHora { hora, total }
            })
            .collect();

        let mut distribucion = DistribucionAreas {
            medicina: 0,
            autoservicio: 0,
        };
        for (area, total) in self.repo.totales_por_area(fecha, sucursal_id).await? {
            match area {
                Area::Medicina => distribucion.medicina = total,
                Area::Autoservicio => distribucion.autoservicio = total,
            }
        }

        let cajeros_activos = self.repo.cajeros_activos(fecha, sucursal_id).await?;

        Ok(SucursalDetalle {
            id: sucursal.id,
            nombre: sucursal.nombre,
            total_clientes,
            cajeros_activos,
            ultima_actualizacion: sucursal.ultima_actualizacion,
            por_hora,
            cajas,
            distribucion,
        })
    }
}

// Completa as seis cajas, zero nas que não aparecem nas linhas agregadas
fn rellenar_cajas(filas: &[CajaTotal]) -> Vec<CajaTotal> {
    (CAJA_MIN..=CAJA_MAX)
        .map(|caja| CajaTotal {
            caja,
            total: filas
                .iter()
                .find(|f| f.caja == caja)
                .map(|f| f.total)
                .unwrap_or(0),
        })
        .collect()
}

// As três cajas de uma área, na ordem, com zeros preenchidos
fn rellenar_area(filas: &[CajaTotal], area: Area) -> Vec<CajaTotal> {
    area.cajas()
        .iter()
        .map(|&caja| CajaTotal {
            caja,
            total: filas
                .iter()
                .find(|f| f.caja == caja)
                .map(|f| f.total)
                .unwrap_or(0),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rellenar_area_completa_con_ceros() {
        let filas = vec![CajaTotal { caja: 5, total: 7 }];

        let medicina = rellenar_area(&filas, Area::Medicina);
        assert_eq!(
            medicina.iter().map(|c| c.total).collect::<Vec<_>>(),
            vec![0, 0, 0]
        );

        let autoservicio = rellenar_area(&filas, Area::Autoservicio);
        assert_eq!(
            autoservicio.iter().map(|c| (c.caja, c.total)).collect::<Vec<_>>(),
            vec![(4, 0), (5, 7), (6, 0)]
        );
    }

    #[test]
    fn rellenar_cajas_siempre_devuelve_seis() {
        let filas = vec![CajaTotal { caja: 2, total: 3 }];
        let cajas = rellenar_cajas(&filas);
        assert_eq!(cajas.len(), 6);
        assert_eq!(cajas[1].total, 3);
        assert_eq!(cajas[0].total, 0);
    }
}
