use std::time::Duration;

use crate::registry::{
    constructor::{ConstructionError, Constructor},
    types::TypeRegistry,
};

/// Half-open integer interval stepped by `step`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Range {
    pub start: i64,
    pub stop: i64,
    pub step: i64,
}

impl Range {
    pub fn new(start: i64, stop: i64) -> Self {
        Self {
            start,
            stop,
            step: 1,
        }
    }

    pub fn with_step(start: i64, stop: i64, step: i64) -> Result<Self, ConstructionError> {
        if step == 0 {
            return Err(ConstructionError::failed("range step cannot be zero"));
        }
        Ok(Self { start, stop, step })
    }

    pub fn iter(&self) -> impl Iterator<Item = i64> + '_ {
        let mut next = self.start;
        std::iter::from_fn(move || {
            let in_range = if self.step > 0 {
                next < self.stop
            } else {
                next > self.stop
            };
            if !in_range {
                return None;
            }
            let current = next;
            next = next.saturating_add(self.step);
            Some(current)
        })
    }

    pub fn len(&self) -> usize {
        let (span, step) = if self.step > 0 {
            (i128::from(self.stop) - i128::from(self.start), i128::from(self.step))
        } else {
            (i128::from(self.start) - i128::from(self.stop), -i128::from(self.step))
        };
        if span <= 0 {
            return 0;
        }
        usize::try_from((span + step - 1) / step).unwrap_or(usize::MAX)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Upper bound on `linspace` samples accepted from a declaration.
pub const MAX_LINSPACE_SAMPLES: usize = 1 << 24;

/// `num` evenly spaced samples over `[start, stop]`.
pub fn linspace(
    start: f64,
    stop: f64,
    num: usize,
    endpoint: bool,
) -> Result<Vec<f64>, ConstructionError> {
    if num > MAX_LINSPACE_SAMPLES {
        return Err(ConstructionError::failed(format!(
            "linspace num {num} exceeds the limit of {MAX_LINSPACE_SAMPLES} samples"
        )));
    }
    let mut samples = Vec::new();
    samples.try_reserve_exact(num).map_err(|err| {
        ConstructionError::failed(format!("cannot allocate {num} linspace samples: {err}"))
    })?;
    match num {
        0 => {}
        1 => samples.push(start),
        _ => {
            let intervals = if endpoint { num - 1 } else { num };
            let step = (stop - start) / intervals as f64;
            samples.extend((0..num).map(|index| start + step * index as f64));
        }
    }
    Ok(samples)
}

/// Catalog of the types every resolver binary understands out of the box:
/// `range`, `linspace` and `duration`.
pub fn builtin_types() -> TypeRegistry {
    TypeRegistry::from_constructors([
        ("range", range_constructor()),
        ("linspace", linspace_constructor()),
        ("duration", duration_constructor()),
    ])
}

fn range_constructor() -> Constructor {
    Constructor::of(|args| {
        let start = args.required::<i64>(0, "start")?;
        let stop = args.required::<i64>(1, "stop")?;
        let step = args.optional::<i64>(2, "step")?.unwrap_or(1);
        Range::with_step(start, stop, step)
    })
}

fn linspace_constructor() -> Constructor {
    Constructor::of(|args| {
        let start = args.required::<f64>(0, "start")?;
        let stop = args.required::<f64>(1, "stop")?;
        let num = args.optional::<usize>(2, "num")?.unwrap_or(50);
        let endpoint = args.optional::<bool>(3, "endpoint")?.unwrap_or(true);
        linspace(start, stop, num, endpoint)
    })
}

fn duration_constructor() -> Constructor {
    Constructor::of(|args| {
        let seconds = args.optional::<f64>(0, "seconds")?.unwrap_or(0.0);
        let millis = args.optional::<f64>(1, "millis")?.unwrap_or(0.0);
        Duration::try_from_secs_f64(seconds + millis / 1_000.0)
            .map_err(|err| ConstructionError::failed(format!("invalid duration: {err}")))
    })
}
