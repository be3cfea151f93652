//! Per-message pipeline sequencing.
//!
//! For each inbound event: load-or-create profile → append inbound turn →
//! candidate reply → humanize → typing-delay suspension → send → append
//! outbound turn → persist. No failure in here is fatal to the process; the
//! worst case is the canned fallback delivered instead of a real reply.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::backend::ReplyBackend;
use crate::persona::Persona;
use crate::platform::send::MessageSender;
use crate::profile::{ProfileStore, Speaker, UserProfile};
use crate::reply::delay::DelayModel;
use crate::reply::humanizer::Humanize;
use crate::reply::prompt::{strip_cue_echo, PromptBuilder};
use crate::reply::selector::{self, ResponseSelector};
use crate::rng::RandomSource;

/// Neutral reply substituted when generation fails or delivery of the real
/// reply fails. Never surfaced as an error.
pub const FALLBACK_REPLY: &str = "running a bit behind, will reply soon!";

/// Generative path: prompt construction plus the backend serving it.
pub struct GenerativePath {
    /// Prompt builder for the configured model.
    pub prompts: PromptBuilder,
    /// Backend the prompts are sent to.
    pub backend: Arc<dyn ReplyBackend>,
}

/// Sequences the reply pipeline for each inbound message.
pub struct Orchestrator {
    persona: Arc<Persona>,
    selector: ResponseSelector,
    generative: Option<GenerativePath>,
    humanizer: Box<dyn Humanize>,
    delays: DelayModel,
    store: Arc<dyn ProfileStore>,
    sender: Arc<dyn MessageSender>,
}

impl Orchestrator {
    /// Wire the pipeline together. With no generative path, every reply
    /// comes from the rule-based selector.
    pub fn new(
        persona: Arc<Persona>,
        generative: Option<GenerativePath>,
        humanizer: Box<dyn Humanize>,
        store: Arc<dyn ProfileStore>,
        sender: Arc<dyn MessageSender>,
    ) -> Self {
        Self {
            persona,
            selector: ResponseSelector::new(),
            generative,
            humanizer,
            delays: DelayModel,
            store,
            sender,
        }
    }

    /// Handle one inbound `(sender_id, text)` event end to end.
    ///
    /// Never returns an error; every failure is logged and degraded to a
    /// best-effort fallback delivery.
    pub async fn handle_message(&self, sender_id: &str, text: &str, rng: &mut dyn RandomSource) {
        let mut profile = match self.store.get(sender_id).await {
            Ok(Some(profile)) => profile,
            Ok(None) => UserProfile::new(sender_id),
            Err(e) => {
                warn!(user_id = sender_id, error = %e, "profile load failed, starting fresh");
                UserProfile::new(sender_id)
            }
        };
        profile.record_turn(Speaker::User, text);

        let candidate = self.candidate_reply(text, &profile, rng).await;
        let reply = self.humanizer.humanize(&candidate, rng);

        let pause = self.delays.typing_delay(&reply, rng);
        debug!(
            user_id = sender_id,
            pause_ms = u64::try_from(pause.as_millis()).unwrap_or(u64::MAX),
            "pausing before send"
        );
        tokio::time::sleep(pause).await;

        if let Err(e) = self.sender.send(sender_id, &reply).await {
            warn!(user_id = sender_id, error = %e, "send failed, attempting fallback delivery");
            if let Err(e) = self.sender.send(sender_id, FALLBACK_REPLY).await {
                warn!(user_id = sender_id, error = %e, "fallback delivery failed");
            }
        }

        profile.record_turn(Speaker::Bot, &reply);
        if let Err(e) = self.store.put(&profile).await {
            warn!(user_id = sender_id, error = %e, "profile persist failed");
        }
    }

    /// Produce the pre-humanization candidate reply.
    ///
    /// First contact and bot-suspicion always take the canned route — the
    /// fixed welcome is deterministic, and a hand-authored deflection
    /// guarantees the reply never self-identifies as automated. Everything
    /// else goes to the backend when one is configured.
    async fn candidate_reply(
        &self,
        text: &str,
        profile: &UserProfile,
        rng: &mut dyn RandomSource,
    ) -> String {
        if profile.response_count == 0 || selector::is_bot_suspicion(text) {
            return self.selector.select(text, profile, rng);
        }
        let Some(generative) = &self.generative else {
            return self.selector.select(text, profile, rng);
        };

        let request = generative.prompts.build(text, profile, false);
        match generative.backend.generate(&request).await {
            Ok(raw) => {
                let reply = strip_cue_echo(&raw, &self.persona.name);
                if reply.is_empty() {
                    warn!(
                        model = generative.backend.model_id(),
                        "backend returned empty text, using fallback"
                    );
                    FALLBACK_REPLY.to_owned()
                } else {
                    reply
                }
            }
            Err(e) => {
                warn!(
                    model = generative.backend.model_id(),
                    error = %e,
                    "generation failed, using fallback"
                );
                FALLBACK_REPLY.to_owned()
            }
        }
    }
}
