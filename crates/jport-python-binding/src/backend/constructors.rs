//! Constructor merge
//!
//! Python classes have one `__init__`. Several Java constructors fold into it:
//! when every parameter list is a prefix of the longest one, the extra
//! parameters become optional; otherwise the initializer takes
//! `*args, **kwargs` and lists the source signatures.

use jport_core::{MappedConstructor, MappedParam};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct InitParam<'a> {
    pub(crate) param: &'a MappedParam,
    /// Not passed by every source constructor: emitted as `T | None = None`.
    pub(crate) optional: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum InitPlan<'a> {
    Absent,
    Single(&'a MappedConstructor),
    Merged {
        params: Vec<InitParam<'a>>,
        constructors: &'a [MappedConstructor],
    },
    Variadic(&'a [MappedConstructor]),
}

impl<'a> InitPlan<'a> {
    pub(crate) fn new(constructors: &'a [MappedConstructor]) -> Self {
        match constructors {
            [] => InitPlan::Absent,
            [single] => InitPlan::Single(single),
            many => match merge_prefixes(many) {
                Some(params) => InitPlan::Merged {
                    params,
                    constructors: many,
                },
                None => InitPlan::Variadic(many),
            },
        }
    }

    /// Warning text for a merge, `None` when nothing was merged.
    pub(crate) fn warning(&self, class: &str) -> Option<String> {
        match self {
            InitPlan::Absent | InitPlan::Single(_) => None,
            InitPlan::Merged { constructors, .. } => Some(format!(
                "{class}: {} constructors merged into one __init__ with optional trailing parameters",
                constructors.len()
            )),
            InitPlan::Variadic(constructors) => Some(format!(
                "{class}: {} constructors have incompatible signatures; __init__ takes *args, **kwargs",
                constructors.len()
            )),
        }
    }

    pub(crate) fn is_variadic(&self) -> bool {
        matches!(self, InitPlan::Variadic(_))
    }

    /// Every source constructor folded into this plan.
    pub(crate) fn sources(&self) -> &'a [MappedConstructor] {
        match self {
            InitPlan::Absent => &[],
            InitPlan::Single(ctor) => std::slice::from_ref(*ctor),
            InitPlan::Merged { constructors, .. } | InitPlan::Variadic(constructors) => *constructors,
        }
    }
}

fn merge_prefixes(constructors: &[MappedConstructor]) -> Option<Vec<InitParam<'_>>> {
    if constructors
        .iter()
        .any(|c| c.params.iter().any(|p| p.varargs))
    {
        return None;
    }

    let longest = constructors.iter().max_by_key(|c| c.params.len())?;
    let shortest = constructors.iter().map(|c| c.params.len()).min()?;
    let all_prefixes = constructors
        .iter()
        .all(|c| longest.source_signature.starts_with(&c.source_signature));
    if !all_prefixes {
        return None;
    }

    Some(
        longest
            .params
            .iter()
            .enumerate()
            .map(|(i, param)| InitParam {
                param,
                optional: i >= shortest,
            })
            .collect(),
    )
}
