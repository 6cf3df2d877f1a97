// src/services/balance.rs
//
// O heurístico de balance entre as cajas de uma área, usado tanto pela visão
// do cajero quanto pelo painel admin: com mais de 2 clientes de diferença
// entre a caja mais e a menos movimentada, a área está desbalanceada.

use rust_decimal::Decimal;

use crate::models::dashboard::{CajaTotal, EstadoBalance};

pub const UMBRAL_DESBALANCE: i64 = 2;

// Diferença entre o maior e o menor contador; zero com menos de dois valores
pub fn diferencia(conteos: &[i64]) -> i64 {
    if conteos.len() < 2 {
        return 0;
    }
    let max = conteos.iter().max().copied().unwrap_or(0);
    let min = conteos.iter().min().copied().unwrap_or(0);
    max - min
}

pub fn clasificar(conteos: &[i64]) -> EstadoBalance {
    if diferencia(conteos) > UMBRAL_DESBALANCE {
        EstadoBalance::Desbalanceado
    } else {
        EstadoBalance::Balanceado
    }
}

// Média por caja ativa (total / cajas com movimento), com uma casa decimal
pub fn promedio_por_caja(cajas: &[CajaTotal]) -> Decimal {
    let activas = cajas.iter().filter(|c| c.total > 0).count() as i64;
    if activas == 0 {
        return Decimal::ZERO;
    }
    let total: i64 = cajas.iter().map(|c| c.total).sum();
    (Decimal::from(total) / Decimal::from(activas)).round_dp(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mas_de_dos_de_diferencia_es_desbalanceado() {
        // caja1: 5, caja2: 2, caja3: 1 -> diferencia 4
        assert_eq!(diferencia(&[5, 2, 1]), 4);
        assert_eq!(clasificar(&[5, 2, 1]), EstadoBalance::Desbalanceado);
    }

    #[test]
    fn hasta_dos_de_diferencia_es_balanceado() {
        // caja4: 3, caja5: 3, caja6: 4 -> diferencia 1
        assert_eq!(diferencia(&[3, 3, 4]), 1);
        assert_eq!(clasificar(&[3, 3, 4]), EstadoBalance::Balanceado);

        // justo en el umbral sigue balanceado
        assert_eq!(clasificar(&[4, 2, 2]), EstadoBalance::Balanceado);
        assert_eq!(clasificar(&[5, 2, 2]), EstadoBalance::Desbalanceado);
    }

    #[test]
    fn con_menos_de_dos_valores_no_hay_desbalance() {
        assert_eq!(diferencia(&[]), 0);
        assert_eq!(diferencia(&[9]), 0);
        assert_eq!(clasificar(&[9]), EstadoBalance::Balanceado);
    }

    #[test]
    fn promedio_solo_cuenta_cajas_activas() {
        let cajas = vec![
            CajaTotal { caja: 1, total: 5 },
            CajaTotal { caja: 2, total: 0 },
            CajaTotal { caja: 3, total: 2 },
        ];
        assert_eq!(promedio_por_caja(&cajas), Decimal::new(35, 1)); // 3.5

        let vacias = vec![CajaTotal { caja: 1, total: 0 }];
        assert_eq!(promedio_por_caja(&vacias), Decimal::ZERO);
    }
}
