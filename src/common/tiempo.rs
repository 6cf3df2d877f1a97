// src/common/tiempo.rs
//
// Helpers de relógio compartilhados pelas visões de cajero e admin. Os dados
// são organizados em baldes de uma hora ("HH:00"), na hora local do servidor.

use chrono::{DateTime, Local, NaiveDate, Timelike, Utc};

pub fn fecha_actual() -> NaiveDate {
    Local::now().date_naive()
}

// O balde da hora atual, ex.: "14:00"
pub fn hora_actual() -> String {
    bucket_hora(Local::now().hour())
}

pub fn bucket_hora(hora: u32) -> String {
    format!("{hora:02}:00")
}

// As 24 horas do dia, "00:00" a "23:00"
pub fn horas_del_dia() -> Vec<String> {
    (0..24).map(bucket_hora).collect()
}

// "HH:MM" na hora local, ou "--:--" quando ainda não houve registro
pub fn formatear_marca(marca: Option<DateTime<Utc>>) -> String {
    match marca {
        Some(m) => m.with_timezone(&Local).format("%H:%M").to_string(),
        None => "--:--".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bucket_con_cero_a_la_izquierda() {
        assert_eq!(bucket_hora(7), "07:00");
        assert_eq!(bucket_hora(14), "14:00");
        assert_eq!(bucket_hora(0), "00:00");
    }

    #[test]
    fn horas_del_dia_cubre_las_24() {
        let horas = horas_del_dia();
        assert_eq!(horas.len(), 24);
        assert_eq!(horas.first().unwrap(), "00:00");
        assert_eq!(horas.last().unwrap(), "23:00");
    }

    #[test]
    fn marca_ausente_es_guiones() {
        assert_eq!(formatear_marca(None), "--:--");
    }
}
