//! Spring interaction.
//!
//! A [`Spring`] pulls a target property toward its destination. Every
//! parameter is a [`ReactiveProperty`]; changing one while the spring runs
//! continues the simulation from the current position and velocity instead
//! of starting over.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use kinetic_core::{
    Disconnector, FrameClock, Interaction, InteractionControls, MotionRuntime, MotionState,
    Observable, Observer, ReactiveProperty, StreamToken, Subscription,
};

use crate::error::SpringError;
use crate::frame_loop::{self, FrameDriven, FrameLoop};
use crate::integrator::SpringIntegrator;
use crate::origami::{self, SpringCoefficients};
use crate::vectorizer::{Vector, Vectorizer};

/// Origami dial settings of a spring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringConfig {
    pub tension: f32,
    pub friction: f32,
    /// Distance and speed below which the spring counts as settled.
    pub threshold: f32,
}

impl SpringConfig {
    pub const DEFAULT_TENSION: f32 = 342.0;
    pub const DEFAULT_FRICTION: f32 = 30.0;
    pub const DEFAULT_THRESHOLD: f32 = 0.001;

    pub fn new(tension: f32, friction: f32) -> Self {
        Self {
            tension,
            friction,
            threshold: Self::DEFAULT_THRESHOLD,
        }
    }

    /// Under-damped; overshoots visibly before settling.
    pub fn bouncy() -> Self {
        Self::new(Self::DEFAULT_TENSION, 12.0)
    }

    /// Fast and close to critically damped.
    pub fn stiff() -> Self {
        Self::new(600.0, 45.0)
    }

    pub fn with_tension(mut self, tension: f32) -> Self {
        self.tension = tension;
        self
    }

    pub fn with_friction(mut self, friction: f32) -> Self {
        self.friction = friction;
        self
    }

    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn coefficients(&self) -> SpringCoefficients {
        SpringCoefficients::from_origami(self.tension, self.friction)
    }

    pub fn damping_ratio(&self) -> f32 {
        origami::damping_ratio(origami::stiffness_from_tension(self.tension), self.friction)
    }
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_TENSION, Self::DEFAULT_FRICTION)
    }
}

struct Params<T> {
    destination: ReactiveProperty<T>,
    initial_value: ReactiveProperty<T>,
    initial_velocity: ReactiveProperty<T>,
    threshold: ReactiveProperty<f32>,
    tension: ReactiveProperty<f32>,
    friction: ReactiveProperty<f32>,
    vectorizer: Rc<dyn Vectorizer<T>>,
}

impl<T> Clone for Params<T> {
    fn clone(&self) -> Self {
        Self {
            destination: self.destination.clone(),
            initial_value: self.initial_value.clone(),
            initial_velocity: self.initial_velocity.clone(),
            threshold: self.threshold.clone(),
            tension: self.tension.clone(),
            friction: self.friction.clone(),
            vectorizer: Rc::clone(&self.vectorizer),
        }
    }
}

impl<T: Clone + 'static> Params<T> {
    fn config(&self) -> SpringConfig {
        SpringConfig::new(self.tension.read(), self.friction.read())
            .with_threshold(self.threshold.read())
    }
}

/// A spring pulling `target` toward `destination`.
pub struct Spring<T> {
    target: ReactiveProperty<T>,
    params: Params<T>,
    controls: InteractionControls,
    token: Cell<Option<StreamToken>>,
}

impl<T: Clone + 'static> Spring<T> {
    pub fn new(
        target: ReactiveProperty<T>,
        vectorizer: impl Vectorizer<T> + 'static,
    ) -> Result<Self, SpringError> {
        Self::with_config(target, vectorizer, SpringConfig::default())
    }

    /// Builds a spring resting at the target's current value.
    ///
    /// The initial value property defaults to the target itself, so each
    /// enable starts from wherever the target currently is.
    pub fn with_config(
        target: ReactiveProperty<T>,
        vectorizer: impl Vectorizer<T> + 'static,
        config: SpringConfig,
    ) -> Result<Self, SpringError> {
        let current = target.read();
        vectorizer.validate(&current)?;
        if vectorizer.dimensions() == 0 {
            return Err(SpringError::InvalidLength { length: 0 });
        }
        if config.tension == 0.0 {
            log::warn!("spring created with zero tension; it will drift instead of settling");
        }
        let still = vectorizer.compose(&vec![0.0; vectorizer.dimensions()]);

        Ok(Self {
            params: Params {
                destination: ReactiveProperty::new(current),
                initial_value: target.clone(),
                initial_velocity: ReactiveProperty::new(still),
                threshold: ReactiveProperty::new(config.threshold),
                tension: ReactiveProperty::new(config.tension),
                friction: ReactiveProperty::new(config.friction),
                vectorizer: Rc::new(vectorizer),
            },
            target,
            controls: InteractionControls::default(),
            token: Cell::new(None),
        })
    }

    /// Reads the starting value from `property` instead of the target.
    pub fn with_initial_value(mut self, property: ReactiveProperty<T>) -> Result<Self, SpringError> {
        self.params.vectorizer.validate(&property.read())?;
        self.params.initial_value = property;
        Ok(self)
    }

    pub fn target(&self) -> &ReactiveProperty<T> {
        &self.target
    }

    pub fn destination(&self) -> &ReactiveProperty<T> {
        &self.params.destination
    }

    pub fn initial_value(&self) -> &ReactiveProperty<T> {
        &self.params.initial_value
    }

    /// Velocity applied when the spring starts, or immediately when written
    /// while it runs.
    pub fn initial_velocity(&self) -> &ReactiveProperty<T> {
        &self.params.initial_velocity
    }

    pub fn threshold(&self) -> &ReactiveProperty<f32> {
        &self.params.threshold
    }

    pub fn tension(&self) -> &ReactiveProperty<f32> {
        &self.params.tension
    }

    pub fn friction(&self) -> &ReactiveProperty<f32> {
        &self.params.friction
    }

    pub fn config(&self) -> SpringConfig {
        self.params.config()
    }

    pub fn token(&self) -> Option<StreamToken> {
        self.token.get()
    }

    /// The simulation as a stream, ignoring `enabled`.
    ///
    /// Each subscription runs its own simulation: it seeds from the initial
    /// value, velocity and destination at subscribe time, reports `Active`
    /// when it starts moving and `AtRest` once settled.
    pub fn stream(&self, clock: &FrameClock) -> Observable<T> {
        let params = self.params.clone();
        let clock = clock.clone();
        Observable::new(move |observer: Observer<T>| {
            SpringSource::connect(params.clone(), clock.clone(), observer)
        })
    }

    /// [`stream`](Self::stream) gated by `enabled`, mirroring its activity
    /// into [`Interaction::state`].
    pub fn interaction_stream(&self, clock: &FrameClock) -> Observable<T> {
        self.stream(clock)
            .gated_by(&self.controls.enabled)
            .observe_state(&self.controls.state)
    }
}

impl<T: Clone + 'static> Interaction for Spring<T> {
    fn enabled(&self) -> &ReactiveProperty<bool> {
        &self.controls.enabled
    }

    fn state(&self) -> Observable<MotionState> {
        self.controls.state_stream()
    }

    fn connect(&self, runtime: &MotionRuntime) {
        if let Some(previous) = self.token.take() {
            runtime.disconnect(previous);
        }
        let token = runtime.write(&self.interaction_stream(runtime.clock()), &self.target);
        self.token.set(Some(token));
    }
}

struct SpringSource<T> {
    params: Params<T>,
    frame_loop: FrameLoop<T>,
    integrator: SpringIntegrator,
    // Parameter callbacks are ignored until the initial replays are over.
    ready: bool,
    last_frame_nanos: Option<u64>,
}

type SourceCell<T> = Rc<RefCell<SpringSource<T>>>;

impl<T: Clone + 'static> FrameDriven for SpringSource<T> {
    type Value = T;

    const NAME: &'static str = "spring";

    fn frame_loop(&mut self) -> &mut FrameLoop<T> {
        &mut self.frame_loop
    }

    fn is_settled(&self) -> bool {
        self.integrator.is_at_rest()
    }

    fn on_start(&mut self) {
        self.last_frame_nanos = None;
    }

    fn step(&mut self, frame_time_nanos: u64) -> Option<T> {
        // The first frame of a run only establishes the time base.
        let last = self.last_frame_nanos.replace(frame_time_nanos)?;
        let delta_secs = frame_time_nanos.saturating_sub(last) as f64 / 1_000_000_000.0;
        self.integrator.advance(delta_secs);
        Some(self.params.vectorizer.compose(self.integrator.position()))
    }
}

impl<T: Clone + 'static> SpringSource<T> {
    fn connect(params: Params<T>, clock: FrameClock, observer: Observer<T>) -> Disconnector {
        let integrator = match Self::seed(&params) {
            Ok(integrator) => integrator,
            Err(error) => {
                log::warn!("spring not started: {error}");
                return Disconnector::noop();
            }
        };

        let this = Rc::new(RefCell::new(SpringSource {
            params,
            frame_loop: FrameLoop::new(clock, observer),
            integrator,
            ready: false,
            last_frame_nanos: None,
        }));
        let subscriptions = Self::observe_parameters(&this);
        this.borrow_mut().ready = true;
        frame_loop::start(&this);

        Disconnector::new(move || {
            for subscription in subscriptions {
                subscription.unsubscribe();
            }
            this.borrow_mut().ready = false;
            frame_loop::stop(&this);
        })
    }

    fn seed(params: &Params<T>) -> Result<SpringIntegrator, SpringError> {
        let vectorizer = &params.vectorizer;
        let initial_value = params.initial_value.read();
        let initial_velocity = params.initial_velocity.read();
        let destination = params.destination.read();
        vectorizer.validate(&initial_value)?;
        vectorizer.validate(&initial_velocity)?;
        vectorizer.validate(&destination)?;

        let config = params.config();
        SpringIntegrator::new(
            config.coefficients(),
            config.threshold,
            &vectorizer.to_vector(&initial_value),
            &vectorizer.to_vector(&initial_velocity),
            &vectorizer.to_vector(&destination),
        )
    }

    fn observe_parameters(this: &SourceCell<T>) -> Vec<Subscription> {
        let params = this.borrow().params.clone();
        let mut subscriptions = Vec::with_capacity(5);

        let weak = Rc::downgrade(this);
        subscriptions.push(params.destination.stream().subscribe_fn(move |destination| {
            if let Some(this) = weak.upgrade() {
                Self::retarget(&this, &destination);
            }
        }));

        let weak = Rc::downgrade(this);
        subscriptions.push(params.initial_velocity.stream().subscribe_fn(move |velocity| {
            if let Some(this) = weak.upgrade() {
                Self::push(&this, &velocity);
            }
        }));

        for dial in [&params.tension, &params.friction, &params.threshold] {
            let weak = Rc::downgrade(this);
            subscriptions.push(dial.stream().subscribe_fn(move |_| {
                if let Some(this) = weak.upgrade() {
                    Self::reconfigure(&this);
                }
            }));
        }
        subscriptions
    }

    /// Converts a written parameter, or logs and returns `None` when it does
    /// not fit the vectorizer.
    fn vector_of(&self, value: &T, parameter: &str) -> Option<Vector> {
        if !self.ready {
            return None;
        }
        match self.params.vectorizer.validate(value) {
            Ok(()) => Some(self.params.vectorizer.to_vector(value)),
            Err(error) => {
                log::warn!("spring {parameter} ignored: {error}");
                None
            }
        }
    }

    fn retarget(this: &SourceCell<T>, destination: &T) {
        {
            let mut source = this.borrow_mut();
            let Some(vector) = source.vector_of(destination, "destination") else {
                return;
            };
            if let Err(error) = source.integrator.set_destination(&vector) {
                log::warn!("spring destination ignored: {error}");
                return;
            }
        }
        frame_loop::start(this);
    }

    fn push(this: &SourceCell<T>, velocity: &T) {
        {
            let mut source = this.borrow_mut();
            let Some(vector) = source.vector_of(velocity, "velocity") else {
                return;
            };
            if let Err(error) = source.integrator.set_velocity(&vector) {
                log::warn!("spring velocity ignored: {error}");
                return;
            }
        }
        frame_loop::start(this);
    }

    fn reconfigure(this: &SourceCell<T>) {
        let params = {
            let source = this.borrow();
            if !source.ready {
                return;
            }
            source.params.clone()
        };
        let config = params.config();
        {
            let mut source = this.borrow_mut();
            source.integrator.set_coefficients(config.coefficients());
            source.integrator.set_threshold(config.threshold);
        }
        frame_loop::start(this);
    }
}

#[cfg(test)]
#[path = "tests/spring_tests.rs"]
mod tests;
