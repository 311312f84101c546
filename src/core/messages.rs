use crate::config::{Reporter, RunConfiguration};
use crate::core::dialogue::{
    xdialog, DialogueCatalog, TemplateValues, GREETING, SMALLTALK, UNFINISHED_MONEY, XDIALOG,
};
use crate::core::stats::{Channel, DispatchedMessage, Outcome, RunReport};
use crate::domain::model::PetKind;
use crate::domain::ports::{Presenter, WorldModel};
use rand::Rng;

pub const NOTHING_TO_DO: &str = "There's nothing to do for the animals right now.";
pub const CAT_REPORT: &str = "Meow..";
pub const DOG_REPORT: &str = "Woof.";
pub const IMAGINARY_PET_REPORT: &str = "Your imaginary pet has taken care of your animals.";
pub const DEFAULT_CARETAKER: &str = "The animal sitter";
const PET_CARETAKER: &str = "Your pet";
const DIALOGUE_END: &str = "#$e#";

/// Everything the selector needs to know, read from the world before selection starts.
#[derive(Debug, Clone)]
pub struct MessageContext {
    pub reporter: Reporter,
    pub outcome: Outcome,
    pub gathering_only: bool,
    pub married: bool,
    pub pet: Option<PetKind>,
    /// Set only when the reporter is a character the world actually knows.
    pub character: Option<String>,
    pub values: TemplateValues,
}

impl MessageContext {
    pub fn gather<W: WorldModel + ?Sized>(
        world: &mut W,
        config: &RunConfiguration,
        report: &RunReport,
        short_days: u32,
    ) -> Self {
        let character = match &config.reporter {
            Reporter::Character(name) => world.character_mut(name).map(|c| c.name.clone()),
            _ => None,
        };

        let farmer = world.farmer();
        let spouse = farmer.spouse.clone();

        Self {
            reporter: config.reporter.clone(),
            outcome: report.outcome,
            gathering_only: report.gathering_only,
            married: farmer.is_married(),
            pet: farmer.pet,
            character,
            values: TemplateValues {
                stats: report.stats,
                actions: report.actions,
                total_cost: report.total_cost,
                cost_per_action: config.cost_per_action,
                checker: gatherer_name(&config.reporter, spouse.as_deref()),
                spouse,
                farmer: farmer.name.clone(),
                short_days,
            },
        }
    }
}

/// The name the report is signed with.
pub fn gatherer_name(reporter: &Reporter, spouse: Option<&str>) -> String {
    match (reporter, spouse) {
        (Reporter::Spouse, Some(spouse)) => spouse.to_string(),
        (Reporter::Spouse, None) | (Reporter::Caretaker, _) => DEFAULT_CARETAKER.to_string(),
        (Reporter::Pet, _) => PET_CARETAKER.to_string(),
        (Reporter::Character(name), _) => name.clone(),
    }
}

fn ambient(text: String) -> DispatchedMessage {
    DispatchedMessage {
        channel: Channel::Ambient,
        speaker: None,
        text,
    }
}

fn payment_addendum(context: &MessageContext, catalog: &DialogueCatalog) -> String {
    let index = match context.outcome {
        Outcome::PaidInFull => xdialog::PAYMENT,
        Outcome::Unaffordable => xdialog::SHORTFALL,
        Outcome::Free | Outcome::NoWorkDone => return String::new(),
    };
    catalog.perform_replacement(catalog.message_at(index, XDIALOG), &context.values)
}

/// Picks the report for this run. Random draws only happen for the character dialogue.
pub fn select<R: Rng>(
    context: &MessageContext,
    catalog: &DialogueCatalog,
    rng: &mut R,
) -> DispatchedMessage {
    let fill = |template: &str| catalog.perform_replacement(template, &context.values);

    if context.outcome == Outcome::NoWorkDone {
        return ambient(NOTHING_TO_DO.to_string());
    }

    match &context.reporter {
        Reporter::Pet => {
            let text = match context.pet {
                Some(PetKind::Cat) => CAT_REPORT,
                Some(PetKind::Dog) => DOG_REPORT,
                None => IMAGINARY_PET_REPORT,
            };
            ambient(text.to_string())
        }
        Reporter::Spouse => {
            let index = if context.married {
                xdialog::SPOUSE_MARRIED
            } else {
                xdialog::SPOUSE_UNMARRIED
            };
            let mut text = fill(catalog.message_at(index, XDIALOG));
            text.push_str(&payment_addendum(context, catalog));
            ambient(text)
        }
        _ if context.gathering_only => {
            let mut text = fill(catalog.message_at(xdialog::GATHERING_ONLY, XDIALOG));
            text.push_str(&payment_addendum(context, catalog));
            ambient(text)
        }
        Reporter::Character(_) => match &context.character {
            Some(name) => {
                let mut text = fill(catalog.random_message(GREETING, rng));
                text.push_str(&fill(catalog.message_at(xdialog::CHARACTER_REPORT, XDIALOG)));

                match context.outcome {
                    Outcome::PaidInFull => text.push_str(&fill(
                        catalog.message_at(xdialog::CHARACTER_PAID, XDIALOG),
                    )),
                    Outcome::Unaffordable => {
                        text.push_str(&fill(catalog.random_message(UNFINISHED_MONEY, rng)))
                    }
                    Outcome::Free | Outcome::NoWorkDone => {}
                }

                text.push_str(&fill(catalog.random_message(SMALLTALK, rng)));
                text.push_str(catalog.portrait_for(name));
                text.push_str(DIALOGUE_END);

                DispatchedMessage {
                    channel: Channel::Dialogue,
                    speaker: Some(name.clone()),
                    text,
                }
            }
            None => ambient(fill(catalog.message_at(xdialog::GENERIC_REPORT, XDIALOG))),
        },
        Reporter::Caretaker => ambient(fill(catalog.message_at(xdialog::GENERIC_REPORT, XDIALOG))),
    }
}

/// Sends the selected message down its channel. Character dialogue is queued on the
/// character before it is presented.
pub fn dispatch<W, P>(message: &DispatchedMessage, world: &mut W, presenter: &mut P)
where
    W: WorldModel + ?Sized,
    P: Presenter + ?Sized,
{
    if message.channel == Channel::Dialogue {
        if let Some(character) = message
            .speaker
            .as_deref()
            .and_then(|name| world.character_mut(name))
        {
            character.push_dialogue(message.text.clone());
            presenter.show_character_dialogue(character, &message.text);
            return;
        }
        tracing::warn!("Dialogue speaker vanished, showing the report as a notification");
    }

    presenter.show_ambient_message(&message.text);
}
