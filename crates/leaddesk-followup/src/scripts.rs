// SPDX-FileCopyrightText: 2026 Leaddesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Contact script templates.
//!
//! `{nome}` and `{indirizzo}` are substituted with the owner's first name and
//! property address. `[Nome Agente]` and `[Agenzia]` stay in the text; the
//! agent fills them in at send time.

use leaddesk_core::Owner;
use serde::{Deserialize, Serialize};

use crate::policy::ScriptKey;

pub const AGENT_PLACEHOLDER: &str = "[Nome Agente]";
pub const AGENCY_PLACEHOLDER: &str = "[Agenzia]";

const ADDRESS_FALLBACK: &str = "il suo immobile";
const NAME_FALLBACK: &str = "Gentile proprietario";

/// Message-style and voice-style scripts for one follow-up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scripts {
    pub whatsapp: String,
    pub voice: String,
}

struct Template {
    title: &'static str,
    whatsapp: &'static str,
    voice: &'static str,
}

fn template(key: ScriptKey) -> Template {
    match key {
        ScriptKey::CallBack => Template {
            title: "Richiamare {nome}",
            whatsapp: "Buongiorno {nome}, sono [Nome Agente] di [Agenzia]. Come concordato la ricontatto per \
                       parlare di {indirizzo}. Quando le farebbe comodo sentirci?",
            voice: "Buongiorno {nome}, sono [Nome Agente] di [Agenzia]. Mi aveva chiesto di richiamarla: \
                    ha qualche minuto per parlare di {indirizzo}?",
        },
        ScriptKey::Interested => Template {
            title: "Ricontattare {nome} (interessato)",
            whatsapp: "Ciao {nome}, sono [Nome Agente] di [Agenzia]. Grazie per l'interesse mostrato ieri: \
                       le invio volentieri una valutazione gratuita per {indirizzo}.",
            voice: "Buongiorno {nome}, sono [Nome Agente] di [Agenzia]. La chiamo per dare seguito alla \
                    nostra conversazione su {indirizzo} e proporle una valutazione gratuita.",
        },
        ScriptKey::Appointment => Template {
            title: "Visita immobile con {nome}",
            whatsapp: "Buongiorno {nome}, sono [Nome Agente] di [Agenzia]. Le confermo l'appuntamento per la \
                       visita di {indirizzo}. A presto!",
            voice: "Buongiorno {nome}, sono [Nome Agente] di [Agenzia]. La chiamo per confermare la visita \
                    di {indirizzo}: è ancora tutto confermato?",
        },
        ScriptKey::NoAnswer => Template {
            title: "Nuovo tentativo con {nome}",
            whatsapp: "Buongiorno {nome}, sono [Nome Agente] di [Agenzia]. Ho provato a chiamarla senza \
                       successo: posso ricontattarla per {indirizzo}?",
            voice: "Buongiorno {nome}, sono [Nome Agente] di [Agenzia]. Ho provato a contattarla ieri: \
                    ha un momento per parlare di {indirizzo}?",
        },
        ScriptKey::NotInterested => Template {
            title: "Ricontatto periodico {nome}",
            whatsapp: "Buongiorno {nome}, sono [Nome Agente] di [Agenzia]. Ci eravamo sentiti qualche \
                       settimana fa per {indirizzo}: il mercato nella sua zona è cambiato, le interessa un \
                       aggiornamento?",
            voice: "Buongiorno {nome}, sono [Nome Agente] di [Agenzia]. La richiamo dopo qualche settimana: \
                    ci sono novità sul mercato che riguardano {indirizzo}.",
        },
        ScriptKey::Generic => Template {
            title: "Follow-up {nome}",
            whatsapp: "Buongiorno {nome}, sono [Nome Agente] di [Agenzia]. La contatto per un aggiornamento \
                       su {indirizzo}.",
            voice: "Buongiorno {nome}, sono [Nome Agente] di [Agenzia]. La chiamo per un breve aggiornamento \
                    su {indirizzo}.",
        },
    }
}

fn fill(text: &str, owner: &Owner) -> String {
    let name = match owner.first_name() {
        "" => NAME_FALLBACK,
        first => first,
    };
    let address = owner
        .address
        .as_deref()
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .unwrap_or(ADDRESS_FALLBACK);
    text.replace("{nome}", name).replace("{indirizzo}", address)
}

/// Renders the script pair for `key`.
pub fn render(key: ScriptKey, owner: &Owner) -> Scripts {
    let t = template(key);
    Scripts {
        whatsapp: fill(t.whatsapp, owner),
        voice: fill(t.voice, owner),
    }
}

/// Renders the appointment title for `key`, using the owner's full name.
pub fn title(key: ScriptKey, owner: &Owner) -> String {
    let name = owner.name.trim();
    let name = if name.is_empty() { NAME_FALLBACK } else { name };
    template(key).title.replace("{nome}", name)
}
