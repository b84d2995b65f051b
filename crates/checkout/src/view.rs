//! Serialisable picture of what the checkout page currently shows.

use serde::Serialize;
use ui::Summary;

use crate::context::CheckoutContext;
use crate::step::StepKind;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepView {
    pub step: StepKind,
    pub active: bool,
    pub hidden: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<Summary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutView {
    pub empty_cart: bool,
    pub place_order_enabled: bool,
    pub steps: Vec<StepView>,
}

impl CheckoutView {
    pub fn capture(ctx: &CheckoutContext) -> Self {
        let steps = StepKind::ALL
            .into_iter()
            .map(|kind| {
                let regions = ctx.layout.step(kind);
                StepView {
                    step: kind,
                    active: regions.root.is_active(),
                    hidden: regions.root.is_hidden(),
                    summary: regions.summary.summary(),
                }
            })
            .collect();
        Self {
            empty_cart: !ctx.layout.empty_cart.is_hidden(),
            place_order_enabled: ctx.place_order_enabled(),
            steps,
        }
    }

    pub fn step(&self, kind: StepKind) -> &StepView {
        &self.steps[kind.index()]
    }

    /// The open step, if any.
    pub fn active_step(&self) -> Option<StepKind> {
        self.steps.iter().find(|view| view.active).map(|view| view.step)
    }
}
