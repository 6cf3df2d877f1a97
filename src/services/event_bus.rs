// src/services/event_bus.rs

use tokio::sync::broadcast;

use crate::models::evento::EventoSistema;

// Canal de eventos ao vivo do processo, um broadcast único: quem registra
// publica, as conexões SSE e o monitor de balance assinam.
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<EventoSistema>,
}

impl EventBus {
    pub fn new(capacidad: usize) -> Self {
        let (tx, _) = broadcast::channel(capacidad);
        Self { tx }
    }

    // Sem assinantes o send falha; isso não é um erro para nós, o evento
    // simplesmente não interessa a ninguém nesse momento.
    pub fn publicar(&self, evento: EventoSistema) {
        if let Err(e) = self.tx.send(evento) {
            tracing::trace!("Evento sin suscriptores: {e}");
        }
    }

    pub fn suscribir(&self) -> broadcast::Receiver<EventoSistema> {
        self.tx.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}
