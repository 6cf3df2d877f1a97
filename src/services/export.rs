// src/services/export.rs

use chrono::NaiveDate;
use genpdf::{elements, style, Alignment, Element};

use crate::{
    common::{error::AppError, tiempo::formatear_marca},
    db::{ConteoRepository, DashboardRepository},
    models::conteo::{DiaConteos, CAJA_MAX, CAJA_MIN},
};

// Gera o relatório diário de uma sucursal em PDF, para o botão de exportação
// do painel admin
#[derive(Clone)]
pub struct ReporteService {
    dashboard_repo: DashboardRepository,
    conteo_repo: ConteoRepository,
}

impl ReporteService {
    pub fn new(dashboard_repo: DashboardRepository, conteo_repo: ConteoRepository) -> Self {
        Self {
            dashboard_repo,
            conteo_repo,
        }
    }

    pub async fn reporte_sucursal(
        &self,
        sucursal_id: &str,
        fecha: NaiveDate,
    ) -> Result<Vec<u8>, AppError> {
        // 1. Busca os dados
        let sucursal = self
            .dashboard_repo
            .sucursal(sucursal_id)
            .await?
            .ok_or(AppError::SucursalNoEncontrada)?;

        let conteos = self.conteo_repo.conteos_del_dia(sucursal_id, fecha).await?;
        let empleados = self.conteo_repo.empleados_del_dia(sucursal_id, fecha).await?;
        let dia = DiaConteos::ensamblar(fecha, conteos, empleados)?;

        // 2. Configura o PDF
        // Carrega a fonte da pasta 'fonts/'
        let font_family = genpdf::fonts::from_files("./fonts", "Roboto", None).map_err(|_| {
            AppError::FuenteNoEncontrada("Fonte não encontrada na pasta ./fonts".to_string())
        })?;

        let mut doc = genpdf::Document::new(font_family);
        doc.set_title(format!("Reporte {} {}", sucursal.nombre, fecha));
        let mut decorator = genpdf::SimplePageDecorator::new();
        decorator.set_margins(10);
        doc.set_page_decorator(decorator);

        // --- CABEÇALHO ---
        doc.push(
            elements::Paragraph::new("FARMACIA GUADALAJARA")
                .styled(style::Style::new().bold().with_font_size(18)),
        );
        doc.push(
            elements::Paragraph::new(format!("Reporte diario - {}", sucursal.nombre))
                .styled(style::Style::new().with_font_size(12)),
        );
        doc.push(elements::Paragraph::new(format!(
            "Fecha: {}",
            fecha.format("%d/%m/%Y")
        )));
        doc.push(elements::Paragraph::new(format!(
            "Última actualización: {}",
            formatear_marca(sucursal.ultima_actualizacion)
        )));

        doc.push(elements::Break::new(1.5));

        // --- TABELA HORA x CAJA ---
        let mut table = elements::TableLayout::new(vec![2, 1, 1, 1, 1, 1, 1, 1]);
        table.set_cell_decorator(elements::FrameCellDecorator::new(true, true, false));

        let style_bold = style::Style::new().bold();
        let mut header = table.row().element(elements::Paragraph::new("Hora").styled(style_bold));
        for caja in CAJA_MIN..=CAJA_MAX {
            header = header.element(
                elements::Paragraph::new(format!("Caja {caja}")).styled(style_bold),
            );
        }
        header
            .element(elements::Paragraph::new("Total").styled(style_bold))
            .push()
            .expect("Table error");

        for hora in &dia.horas {
            let mut row = table.row().element(elements::Paragraph::new(hora.hora.clone()));
            for total in dia.contadores_de_hora(&hora.hora) {
                row = row.element(elements::Paragraph::new(format!("{total}")));
            }
            row.element(elements::Paragraph::new(format!("{}", hora.total)))
                .push()
                .expect("Table row error");
        }

        doc.push(table);
        doc.push(elements::Break::new(2));

        // --- TOTAL ---
        let mut total_paragraph =
            elements::Paragraph::new(format!("TOTAL DEL DÍA: {} clientes", dia.total));
        total_paragraph.set_alignment(Alignment::Right);
        doc.push(total_paragraph.styled(style::Style::new().bold().with_font_size(12)));

        // 3. Renderiza para buffer (memória)
        let mut buffer = Vec::new();
        doc.render(&mut buffer)
            .map_err(|e| AppError::InternalServerError(anyhow::Error::msg(e.to_string())))?;

        Ok(buffer)
    }
}
