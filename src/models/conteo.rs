// src/models/conteo.rs

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::common::error::AppError;

pub const CAJA_MIN: i16 = 1;
pub const CAJA_MAX: i16 = 6;

/// Agrupamento das cajas: 1 a 3 atendem o balcão de medicina, 4 a 6 o
/// autoservicio. A derivação é uma função total da caja; fora da faixa
/// conhecida cai em medicina.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "area", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Area {
    Medicina,
    Autoservicio,
}

impl Area {
    pub fn de_caja(caja: i16) -> Area {
        match caja {
            4..=6 => Area::Autoservicio,
            _ => Area::Medicina,
        }
    }

    // As três cajas que compõem a área
    pub fn cajas(&self) -> [i16; 3] {
        match self {
            Area::Medicina => [1, 2, 3],
            Area::Autoservicio => [4, 5, 6],
        }
    }
}

impl std::fmt::Display for Area {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Area::Medicina => write!(f, "medicina"),
            Area::Autoservicio => write!(f, "autoservicio"),
        }
    }
}

// Registro de um cliente atendido em uma caja
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegistrarPayload {
    #[validate(range(min = 1, max = 6, message = "La caja debe estar entre 1 y 6."))]
    #[schema(example = 2)]
    pub caja: i16,
}

// Linha da tabela `conteos` como vem do banco
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ConteoRow {
    pub sucursal_id: String,
    pub fecha: NaiveDate,
    pub hora: String,
    pub caja: i16,
    pub area: Area,
    pub total: i64,
    pub ultima_actualizacion: DateTime<Utc>,
}

// Linha da tabela `conteo_empleados`
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct EmpleadoConteoRow {
    pub hora: String,
    pub caja: i16,
    pub empleado: String,
    pub total: i64,
}

// Contador de uma caja dentro de uma hora, com os subcontadores por empleado
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CajaHora {
    pub caja: i16,
    pub area: Area,
    pub total: i64,
    pub empleados: BTreeMap<String, i64>,
    pub ultima_actualizacion: DateTime<Utc>,
}

// Uma hora do dia com suas cajas
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HoraConteos {
    #[schema(example = "14:00")]
    pub hora: String,
    pub cajas: Vec<CajaHora>,
    pub total: i64,
}

// O dia completo de uma sucursal, da hora mais recente para a mais antiga
// (a ordem em que a tabela de produtividade exibe)
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DiaConteos {
    pub fecha: NaiveDate,
    pub horas: Vec<HoraConteos>,
    pub total: i64,
}

impl DiaConteos {
    /// Reconstrói a visão do dia a partir das linhas do banco, verificando o
    /// invariante de integridade: o total de cada caja/hora tem que ser igual
    /// à soma dos subcontadores por empleado.
    pub fn ensamblar(
        fecha: NaiveDate,
        conteos: Vec<ConteoRow>,
        empleados: Vec<EmpleadoConteoRow>,
    ) -> Result<Self, AppError> {
        let mut por_caja: BTreeMap<(String, i16), BTreeMap<String, i64>> = BTreeMap::new();
        for fila in empleados {
            por_caja
                .entry((fila.hora, fila.caja))
                .or_default()
                .insert(fila.empleado, fila.total);
        }

        let mut horas: BTreeMap<String, Vec<CajaHora>> = BTreeMap::new();
        for fila in conteos {
            let empleados = por_caja
                .remove(&(fila.hora.clone(), fila.caja))
                .unwrap_or_default();

            let suma: i64 = empleados.values().sum();
            if suma != fila.total {
                return Err(AppError::DatosInconsistentes {
                    detalle: format!(
                        "caja {} a las {}: total {} vs suma de empleados {}",
                        fila.caja, fila.hora, fila.total, suma
                    ),
                });
            }

            horas.entry(fila.hora).or_default().push(CajaHora {
                caja: fila.caja,
                area: fila.area,
                total: fila.total,
                empleados,
                ultima_actualizacion: fila.ultima_actualizacion,
            });
        }

        let mut filas: Vec<HoraConteos> = horas
            .into_iter()
            .map(|(hora, cajas)| {
                let total = cajas.iter().map(|c| c.total).sum();
                HoraConteos { hora, cajas, total }
            })
            .collect();
        filas.reverse();

        let total = filas.iter().map(|h| h.total).sum();
        Ok(DiaConteos { fecha, horas: filas, total })
    }

    pub fn total_de_hora(&self, hora: &str) -> i64 {
        self.horas
            .iter()
            .find(|h| h.hora == hora)
            .map(|h| h.total)
            .unwrap_or(0)
    }

    pub fn total_de_empleado(&self, empleado: &str) -> i64 {
        self.horas
            .iter()
            .flat_map(|h| h.cajas.iter())
            .filter_map(|c| c.empleados.get(empleado))
            .sum()
    }

    pub fn total_de_caja(&self, hora: &str, caja: i16) -> i64 {
        self.horas
            .iter()
            .find(|h| h.hora == hora)
            .and_then(|h| h.cajas.iter().find(|c| c.caja == caja))
            .map(|c| c.total)
            .unwrap_or(0)
    }

    // Os seis contadores de uma hora, com zero nas cajas sem movimento
    pub fn contadores_de_hora(&self, hora: &str) -> Vec<i64> {
        (CAJA_MIN..=CAJA_MAX)
            .map(|caja| self.total_de_caja(hora, caja))
            .collect()
    }

    /// Tabela de produtividade pessoal: por hora, o subcontador do empleado em
    /// cada caja, caindo para o total da caja quando ele não tem subcontador.
    /// Horas sem movimento ficam fora.
    pub fn filas_productividad(&self, empleado: &str) -> Vec<FilaProductividad> {
        self.horas
            .iter()
            .filter_map(|h| {
                let cajas: Vec<i64> = (CAJA_MIN..=CAJA_MAX)
                    .map(|num| {
                        h.cajas
                            .iter()
                            .find(|c| c.caja == num)
                            .map(|c| c.empleados.get(empleado).copied().unwrap_or(c.total))
                            .unwrap_or(0)
                    })
                    .collect();
                let total: i64 = cajas.iter().sum();
                (total > 0).then(|| FilaProductividad {
                    hora: h.hora.clone(),
                    cajas,
                    total,
                })
            })
            .collect()
    }
}

// Linha da tabela de produtividade do cajero
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FilaProductividad {
    pub hora: String,
    // Sempre seis posições, caja 1 a caja 6
    pub cajas: Vec<i64>,
    pub total: i64,
}

// Os três contadores do painel do cajero
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResumenCajero {
    pub total_dia: i64,
    pub total_hora_actual: i64,
    pub mis_clientes: i64,
}

// Confirmação devolvida após registrar um cliente: o valor autoritativo com
// o qual o cliente reconcilia o incremento otimista
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegistroConfirmado {
    pub caja: i16,
    pub area: Area,
    pub hora: String,
    pub total_caja: i64,
    pub resumen: ResumenCajero,
    pub marca: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fila(hora: &str, caja: i16, total: i64) -> ConteoRow {
        ConteoRow {
            sucursal_id: "sucursal_1".into(),
            fecha: NaiveDate::from_ymd_opt(2026, 3, 14).unwrap(),
            hora: hora.into(),
            caja,
            area: Area::de_caja(caja),
            total,
            ultima_actualizacion: Utc::now(),
        }
    }

    fn sub(hora: &str, caja: i16, empleado: &str, total: i64) -> EmpleadoConteoRow {
        EmpleadoConteoRow {
            hora: hora.into(),
            caja,
            empleado: empleado.into(),
            total,
        }
    }

    #[test]
    fn area_derivada_de_la_caja() {
        assert_eq!(Area::de_caja(1), Area::Medicina);
        assert_eq!(Area::de_caja(2), Area::Medicina);
        assert_eq!(Area::de_caja(3), Area::Medicina);
        assert_eq!(Area::de_caja(4), Area::Autoservicio);
        assert_eq!(Area::de_caja(5), Area::Autoservicio);
        assert_eq!(Area::de_caja(6), Area::Autoservicio);
        // fuera de rango cae en medicina
        assert_eq!(Area::de_caja(0), Area::Medicina);
        assert_eq!(Area::de_caja(7), Area::Medicina);
    }

    #[test]
    fn ensamblar_ordena_horas_descendente_y_suma() {
        let fecha = NaiveDate::from_ymd_opt(2026, 3, 14).unwrap();
        let conteos = vec![fila("09:00", 1, 2), fila("11:00", 4, 3), fila("10:00", 2, 1)];
        let empleados = vec![
            sub("09:00", 1, "empleado_001", 2),
            sub("11:00", 4, "empleado_002", 3),
            sub("10:00", 2, "empleado_001", 1),
        ];

        let dia = DiaConteos::ensamblar(fecha, conteos, empleados).unwrap();
        let horas: Vec<&str> = dia.horas.iter().map(|h| h.hora.as_str()).collect();
        assert_eq!(horas, vec!["11:00", "10:00", "09:00"]);
        assert_eq!(dia.total, 6);
        assert_eq!(dia.total_de_hora("11:00"), 3);
        assert_eq!(dia.total_de_empleado("empleado_001"), 3);
        assert_eq!(dia.contadores_de_hora("09:00"), vec![2, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn ensamblar_rechaza_totales_inconsistentes() {
        let fecha = NaiveDate::from_ymd_opt(2026, 3, 14).unwrap();
        let conteos = vec![fila("09:00", 1, 5)];
        let empleados = vec![sub("09:00", 1, "empleado_001", 3)];

        let resultado = DiaConteos::ensamblar(fecha, conteos, empleados);
        assert!(matches!(
            resultado,
            Err(AppError::DatosInconsistentes { .. })
        ));
    }

    #[test]
    fn productividad_usa_subconteo_del_empleado_con_fallback_al_total() {
        let fecha = NaiveDate::from_ymd_opt(2026, 3, 14).unwrap();
        let conteos = vec![fila("09:00", 1, 4), fila("09:00", 2, 2)];
        let empleados = vec![
            sub("09:00", 1, "empleado_001", 1),
            sub("09:00", 1, "empleado_002", 3),
            // caja 2 sin subconteo del empleado_001: se usa el total
            sub("09:00", 2, "empleado_002", 2),
        ];

        let dia = DiaConteos::ensamblar(fecha, conteos, empleados).unwrap();
        let filas = dia.filas_productividad("empleado_001");
        assert_eq!(filas.len(), 1);
        assert_eq!(filas[0].cajas, vec![1, 2, 0, 0, 0, 0]);
        assert_eq!(filas[0].total, 3);
    }
}
