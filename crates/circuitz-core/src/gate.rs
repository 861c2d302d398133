//! Logic gate family.
//!
//! Every gate follows the same fold over its input connections, parameterized
//! by a combinator and a final transform:
//!
//! ```text
//! first input      -> acc = level
//! further inputs   -> acc = combine(acc, level)
//! any broken input -> Broken (immediately)
//! covered != slots -> Broken
//! otherwise        -> transform(acc)
//! ```

use std::fmt;
use std::ops::ControlFlow;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::power::PowerState;
use crate::slot::MAX_INPUT_SLOTS;

/// The seven gate kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GateKind {
    And,
    Or,
    Nand,
    Nor,
    Xor,
    Xnor,
    Not,
}

/// How a gate folds further inputs into its accumulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combinator {
    /// Any off input collapses the accumulator to 0 for good.
    All,
    /// Any on input raises the accumulator to 1.
    Any,
    /// The accumulator counts on inputs.
    Count,
    /// Single input, nothing to fold.
    Single,
}

/// What a gate does with the accumulator once every input is folded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Transform {
    Identity,
    Negate,
    Odd,
    Even,
}

impl GateKind {
    /// All gate kinds.
    pub const ALL: [GateKind; 7] = [
        GateKind::And,
        GateKind::Or,
        GateKind::Nand,
        GateKind::Nor,
        GateKind::Xor,
        GateKind::Xnor,
        GateKind::Not,
    ];

    /// Registry name, also used as the node title.
    pub fn name(self) -> &'static str {
        match self {
            GateKind::And => "And",
            GateKind::Or => "Or",
            GateKind::Nand => "Nand",
            GateKind::Nor => "Nor",
            GateKind::Xor => "Xor",
            GateKind::Xnor => "Xnor",
            GateKind::Not => "Not",
        }
    }

    /// Input count of a freshly created gate, also its minimum.
    pub fn default_inputs(self) -> usize {
        match self {
            GateKind::Not => 1,
            _ => 2,
        }
    }

    /// Largest input count this gate accepts.
    pub fn max_inputs(self) -> usize {
        match self {
            GateKind::Not => 1,
            _ => MAX_INPUT_SLOTS,
        }
    }

    /// Whether the input count can be changed at all.
    pub fn is_resizable(self) -> bool {
        self.max_inputs() > self.default_inputs()
    }

    /// Clamp a requested input count into this gate's accepted range.
    pub fn clamp_inputs(self, requested: usize) -> usize {
        requested.clamp(self.default_inputs(), self.max_inputs())
    }

    fn combinator(self) -> Combinator {
        match self {
            GateKind::And | GateKind::Nand => Combinator::All,
            GateKind::Or | GateKind::Nor => Combinator::Any,
            GateKind::Xor | GateKind::Xnor => Combinator::Count,
            GateKind::Not => Combinator::Single,
        }
    }

    fn transform(self) -> Transform {
        match self {
            GateKind::And | GateKind::Or => Transform::Identity,
            GateKind::Nand | GateKind::Nor | GateKind::Not => Transform::Negate,
            GateKind::Xor => Transform::Odd,
            GateKind::Xnor => Transform::Even,
        }
    }

    /// Evaluate this gate over already-resolved input states, as if each state
    /// arrived through one connection and the gate had `slots` input slots.
    pub fn evaluate(self, inputs: &[PowerState], slots: usize) -> PowerState {
        let mut fold = GateFold::new(self);
        for &input in inputs {
            if let ControlFlow::Break(state) = fold.push(input) {
                return state;
            }
        }
        fold.finish(slots)
    }
}

impl fmt::Display for GateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for GateKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GateKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown gate: {s}"))
    }
}

/// Per-node gate state: its kind. The input count lives in the node's slot list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gate {
    pub kind: GateKind,
}

impl Gate {
    pub fn new(kind: GateKind) -> Self {
        Self { kind }
    }
}

/// Running accumulator for one gate evaluation.
#[derive(Debug, Clone)]
pub struct GateFold {
    kind: GateKind,
    acc: u32,
    covered: usize,
}

impl GateFold {
    pub fn new(kind: GateKind) -> Self {
        Self {
            kind,
            acc: 0,
            covered: 0,
        }
    }

    /// Number of input connections folded so far.
    pub fn covered(&self) -> usize {
        self.covered
    }

    /// Fold one upstream state. Breaks with `Broken` on a broken input.
    pub fn push(&mut self, upstream: PowerState) -> ControlFlow<PowerState> {
        self.covered += 1;

        let Some(level) = upstream.level() else {
            return ControlFlow::Break(PowerState::Broken);
        };

        if self.covered == 1 {
            self.acc = u32::from(level);
            return ControlFlow::Continue(());
        }

        match self.kind.combinator() {
            Combinator::All => {
                if !level {
                    self.acc = 0;
                }
            }
            Combinator::Any => {
                if level {
                    self.acc = 1;
                }
            }
            Combinator::Count => {
                if level {
                    self.acc += 1;
                }
            }
            Combinator::Single => {}
        }

        ControlFlow::Continue(())
    }

    /// Resolve the gate output given how many input slots the gate has.
    pub fn finish(&self, expected: usize) -> PowerState {
        if self.covered != expected {
            return PowerState::Broken;
        }

        let level = match self.kind.transform() {
            Transform::Identity => self.acc != 0,
            Transform::Negate => self.acc == 0,
            Transform::Odd => self.acc % 2 == 1,
            Transform::Even => self.acc % 2 == 0,
        };

        PowerState::from_bool(level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use PowerState::{Broken, Off, On};

    fn eval(kind: GateKind, inputs: &[PowerState]) -> PowerState {
        kind.evaluate(inputs, inputs.len())
    }

    #[test]
    fn test_and_or_truth_tables() {
        assert_eq!(eval(GateKind::And, &[On, On]), On);
        assert_eq!(eval(GateKind::And, &[On, Off]), Off);
        assert_eq!(eval(GateKind::And, &[Off, On]), Off);
        assert_eq!(eval(GateKind::And, &[Off, Off]), Off);

        assert_eq!(eval(GateKind::Or, &[On, On]), On);
        assert_eq!(eval(GateKind::Or, &[On, Off]), On);
        assert_eq!(eval(GateKind::Or, &[Off, On]), On);
        assert_eq!(eval(GateKind::Or, &[Off, Off]), Off);
    }

    #[test]
    fn test_inverted_pairs_are_complements() {
        let levels = [Off, On];
        for a in levels {
            for b in levels {
                for c in levels {
                    let inputs = [a, b, c];
                    let and = eval(GateKind::And, &inputs).is_on();
                    let or = eval(GateKind::Or, &inputs).is_on();
                    let xor = eval(GateKind::Xor, &inputs).is_on();
                    assert_eq!(eval(GateKind::Nand, &inputs).is_on(), !and);
                    assert_eq!(eval(GateKind::Nor, &inputs).is_on(), !or);
                    assert_eq!(eval(GateKind::Xnor, &inputs).is_on(), !xor);
                }
            }
        }
    }

    #[test]
    fn test_and_off_is_sticky() {
        assert_eq!(eval(GateKind::And, &[On, Off, On, On]), Off);
    }

    #[test]
    fn test_not() {
        assert_eq!(eval(GateKind::Not, &[On]), Off);
        assert_eq!(eval(GateKind::Not, &[Off]), On);
    }

    #[test]
    fn test_xor_is_parity() {
        assert_eq!(eval(GateKind::Xor, &[On, On, On]), On);
        assert_eq!(eval(GateKind::Xor, &[On, On]), Off);
        assert_eq!(eval(GateKind::Xor, &[Off, On, Off, Off]), On);
        assert_eq!(eval(GateKind::Xnor, &[On, On]), On);
        assert_eq!(eval(GateKind::Xnor, &[Off, Off, On]), Off);
    }

    #[test]
    fn test_missing_input_is_broken() {
        for kind in GateKind::ALL {
            let slots = kind.default_inputs() + 1;
            let inputs = vec![On; slots - 1];
            assert_eq!(kind.evaluate(&inputs, slots), Broken, "{kind}");
        }
    }

    #[test]
    fn test_broken_absorbs() {
        assert_eq!(eval(GateKind::Or, &[On, Broken]), Broken);
        assert_eq!(eval(GateKind::And, &[Off, Broken, On]), Broken);
        assert_eq!(eval(GateKind::Not, &[Broken]), Broken);
    }

    #[test]
    fn test_broken_short_circuits_remaining_inputs() {
        let mut fold = GateFold::new(GateKind::Xor);
        assert_eq!(fold.push(On), ControlFlow::Continue(()));
        assert_eq!(fold.push(Broken), ControlFlow::Break(Broken));
        assert_eq!(fold.covered(), 2);
    }

    #[test]
    fn test_input_bounds() {
        assert!(!GateKind::Not.is_resizable());
        assert_eq!(GateKind::Not.clamp_inputs(5), 1);
        assert_eq!(GateKind::And.clamp_inputs(0), 2);
        assert_eq!(GateKind::Or.clamp_inputs(99), MAX_INPUT_SLOTS);
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("xnor".parse::<GateKind>(), Ok(GateKind::Xnor));
        assert_eq!("And".parse::<GateKind>(), Ok(GateKind::And));
        assert!("buffer".parse::<GateKind>().is_err());
    }
}
