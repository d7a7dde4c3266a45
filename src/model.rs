use crate::DEFAULT_PARAMETERS;
use crate::card::Rating;
use crate::config::{ForgettingCurve, SchedulerConfig};
use crate::error::{FSRSError, Result};
use crate::inference::{D_MAX, D_MIN, FSRS5_DECAY, Memory, Parameters, S_MAX, S_MIN};
use crate::parameter_clipper::clip_parameters;
use log::debug;

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Model {
    pub w: [f64; 19],
    pub curve: ForgettingCurve,
}

impl Model {
    /// `parameters` must already be filled to 19 values.
    pub fn new(parameters: &Parameters, curve: ForgettingCurve) -> Self {
        let mut w = DEFAULT_PARAMETERS;
        w.iter_mut()
            .zip(clip_parameters(parameters))
            .for_each(|(w, p)| *w = p);
        Self { w, curve }
    }

    /// `0.9 ^ (1 / decay) - 1`, chosen so that retrievability is 0.9 when
    /// `t == s`.
    fn factor() -> f64 {
        0.9f64.powf(1.0 / FSRS5_DECAY) - 1.0
    }

    pub fn forgetting_curve(&self, t: f64, s: f64) -> f64 {
        debug_assert!(t >= 0.);
        match self.curve {
            ForgettingCurve::Power => (t / s).mul_add(Self::factor(), 1.0).powf(FSRS5_DECAY),
            ForgettingCurve::Exponential => (0.9f64.ln() * t / s).exp(),
        }
    }

    /// Days until retrievability falls to `desired_retention`, unrounded.
    pub fn next_interval(&self, stability: f64, desired_retention: f64) -> f64 {
        match self.curve {
            ForgettingCurve::Power => {
                stability / Self::factor() * (desired_retention.powf(1.0 / FSRS5_DECAY) - 1.0)
            }
            ForgettingCurve::Exponential => stability * desired_retention.ln() / 0.9f64.ln(),
        }
    }

    pub fn init_stability(&self, rating: Rating) -> f64 {
        self.w[rating.index()]
    }

    pub fn init_difficulty(&self, rating: Rating) -> f64 {
        self.w[4] - (self.w[5] * (rating.as_f64() - 1.0)).exp() + 1.0
    }

    fn linear_damping(&self, delta_d: f64, old_d: f64) -> f64 {
        (10.0 - old_d) / 9.0 * delta_d
    }

    pub fn next_difficulty(&self, difficulty: f64, rating: Rating) -> f64 {
        let delta_d = -self.w[6] * (rating.as_f64() - 3.0);
        difficulty + self.linear_damping(delta_d, difficulty)
    }

    pub fn mean_reversion(&self, new_d: f64) -> f64 {
        self.w[7] * self.init_difficulty(Rating::Easy) + (1.0 - self.w[7]) * new_d
    }

    pub fn stability_after_success(&self, last_s: f64, last_d: f64, r: f64, rating: Rating) -> f64 {
        let hard_penalty = if rating == Rating::Hard { self.w[15] } else { 1.0 };
        let easy_bonus = if rating == Rating::Easy { self.w[16] } else { 1.0 };
        last_s
            * (self.w[8].exp()
                * (11.0 - last_d)
                * last_s.powf(-self.w[9])
                * (((1.0 - r) * self.w[10]).exp() - 1.0)
                * hard_penalty)
                .mul_add(easy_bonus, 1.0)
    }

    pub fn stability_after_failure(&self, last_s: f64, last_d: f64, r: f64) -> f64 {
        let new_s = self.w[11]
            * last_d.powf(-self.w[12])
            * ((last_s + 1.0).powf(self.w[13]) - 1.0)
            * ((1.0 - r) * self.w[14]).exp();
        let new_s_min = last_s / (self.w[17] * self.w[18]).exp();
        new_s.min(new_s_min)
    }

    pub fn stability_short_term(&self, last_s: f64, rating: Rating) -> f64 {
        last_s * (self.w[17] * (rating.as_f64() - 3.0 + self.w[18])).exp()
    }

    /// Advances the memory by one review. `last` is `None` for a first review.
    pub fn step(&self, delta_t: u32, rating: Rating, last: Option<Memory>) -> Memory {
        let Some(last) = last else {
            return Memory {
                stability: self.init_stability(rating).clamp(S_MIN, S_MAX),
                difficulty: self.init_difficulty(rating).clamp(D_MIN, D_MAX),
            };
        };
        self.next_memory(delta_t, rating, last, delta_t == 0)
    }

    /// Same as [`Model::step`] on an existing memory, but never switches to
    /// the short-term formula. On the review day itself `r == 1`, so a
    /// successful answer keeps stability where it was.
    pub fn step_long_term(&self, delta_t: u32, rating: Rating, last: Memory) -> Memory {
        self.next_memory(delta_t, rating, last, false)
    }

    fn next_memory(&self, delta_t: u32, rating: Rating, last: Memory, short_term: bool) -> Memory {
        let last_s = last.stability.clamp(S_MIN, S_MAX);
        let last_d = last.difficulty.clamp(D_MIN, D_MAX);

        let new_s = if short_term {
            self.stability_short_term(last_s, rating)
        } else {
            let r = self.forgetting_curve(delta_t as f64, last_s);
            match rating {
                Rating::Again => self.stability_after_failure(last_s, last_d, r),
                _ => self.stability_after_success(last_s, last_d, r, rating),
            }
        };
        let new_d = self
            .mean_reversion(self.next_difficulty(last_d, rating))
            .clamp(D_MIN, D_MAX);

        Memory {
            stability: new_s.clamp(S_MIN, S_MAX),
            difficulty: new_d,
        }
    }
}

/// The scheduler. Immutable once built, so one instance can serve any number
/// of threads.
#[derive(Debug, Clone, PartialEq)]
pub struct FSRS {
    pub(crate) model: Model,
    pub(crate) config: SchedulerConfig,
}

impl FSRS {
    pub fn new(config: SchedulerConfig) -> Result<Self> {
        config.validate()?;
        let parameters = check_and_fill_parameters(&config.parameters)?;
        let model = Model::new(&parameters, config.forgetting_curve);
        debug!("scheduler parameters: {:?}", &model.w);
        Ok(Self { model, config })
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// The clipped 19-value weight vector in use.
    pub fn parameters(&self) -> &[f64] {
        &self.model.w
    }
}

impl Default for FSRS {
    fn default() -> Self {
        Self {
            model: Model::new(&DEFAULT_PARAMETERS, ForgettingCurve::default()),
            config: SchedulerConfig::default(),
        }
    }
}

pub(crate) fn check_and_fill_parameters(parameters: &Parameters) -> Result<Vec<f64>, FSRSError> {
    let parameters = match parameters.len() {
        0 => DEFAULT_PARAMETERS.to_vec(),
        17 => {
            let mut parameters = parameters.to_vec();
            parameters[4] = parameters[5].mul_add(2.0, parameters[4]);
            parameters[5] = parameters[5].mul_add(3.0, 1.0).ln() / 3.0;
            parameters[6] += 0.5;
            parameters.extend_from_slice(&[0.0, 0.0]);
            parameters
        }
        19 => parameters.to_vec(),
        _ => return Err(FSRSError::InvalidParameters),
    };
    if parameters.iter().any(|&w| !w.is_finite()) {
        return Err(FSRSError::InvalidParameters);
    }
    Ok(parameters)
}
