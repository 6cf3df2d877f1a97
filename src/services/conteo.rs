// src/services/conteo.rs

use chrono::Utc;

use crate::{
    common::{
        error::AppError,
        tiempo::{fecha_actual, hora_actual},
    },
    db::ConteoRepository,
    models::{
        auth::{Rol, Usuario},
        conteo::{
            Area, DiaConteos, FilaProductividad, RegistroConfirmado, ResumenCajero, CAJA_MAX,
            CAJA_MIN,
        },
        evento::{EventoRegistro, EventoSistema},
    },
    services::event_bus::EventBus,
};

// O fluxo de registro do cajero e as visões de leitura da própria sucursal
#[derive(Clone)]
pub struct RegistroService {
    repo: ConteoRepository,
    bus: EventBus,
}

impl RegistroService {
    pub fn new(repo: ConteoRepository, bus: EventBus) -> Self {
        Self { repo, bus }
    }

    /// Registra um cliente atendido na caja. A hora é sempre o balde atual do
    /// relógio do servidor: o cliente não escolhe em qual hora escrever. A
    /// resposta traz os contadores autoritativos pós-commit, contra os quais
    /// o incremento otimista da interface se reconcilia.
    pub async fn registrar(
        &self,
        usuario: &Usuario,
        caja: i16,
    ) -> Result<RegistroConfirmado, AppError> {
        if usuario.rol != Rol::Cajero {
            return Err(AppError::AccesoDenegado);
        }
        if !(CAJA_MIN..=CAJA_MAX).contains(&caja) {
            return Err(AppError::CajaFueraDeRango(caja));
        }

        let area = Area::de_caja(caja);
        let fecha = fecha_actual();
        let hora = hora_actual();
        let marca = Utc::now();

        self.repo
            .registrar_cliente(
                &usuario.sucursal_id,
                &usuario.empleado,
                caja,
                area,
                fecha,
                &hora,
                marca,
            )
            .await?;

        // Relê o dia para responder com os valores autoritativos
        let dia = self.dia(usuario).await?;
        let resumen = self.resumen_de(&dia, usuario);
        let total_caja = dia.total_de_caja(&hora, caja);

        self.bus.publicar(EventoSistema::Registro(EventoRegistro {
            id: uuid::Uuid::new_v4(),
            sucursal_id: usuario.sucursal_id.clone(),
            caja,
            area,
            empleado: usuario.empleado.clone(),
            tipo: "registro".to_string(),
            creado_en: marca,
        }));

        tracing::info!(
            sucursal = %usuario.sucursal_id,
            caja,
            empleado = %usuario.empleado,
            "Cliente registrado"
        );

        Ok(RegistroConfirmado {
            caja,
            area,
            hora,
            total_caja,
            resumen,
            marca,
        })
    }

    // A visão do dia da sucursal do usuário
    pub async fn dia(&self, usuario: &Usuario) -> Result<DiaConteos, AppError> {
        let fecha = fecha_actual();
        let conteos = self.repo.conteos_del_dia(&usuario.sucursal_id, fecha).await?;
        let empleados = self
            .repo
            .empleados_del_dia(&usuario.sucursal_id, fecha)
            .await?;

        DiaConteos::ensamblar(fecha, conteos, empleados)
    }

    pub async fn resumen(&self, usuario: &Usuario) -> Result<ResumenCajero, AppError> {
        let dia = self.dia(usuario).await?;
        Ok(self.resumen_de(&dia, usuario))
    }

    pub async fn productividad(
        &self,
        usuario: &Usuario,
    ) -> Result<Vec<FilaProductividad>, AppError> {
        let dia = self.dia(usuario).await?;
        Ok(dia.filas_productividad(&usuario.empleado))
    }

    fn resumen_de(&self, dia: &DiaConteos, usuario: &Usuario) -> ResumenCajero {
        ResumenCajero {
            total_dia: dia.total,
            total_hora_actual: dia.total_de_hora(&hora_actual()),
            mis_clientes: dia.total_de_empleado(&usuario.empleado),
        }
    }
}
