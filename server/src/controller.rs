use std::future::IntoFuture;
use std::marker::PhantomData;

// Original: https://github.com/HalsekiRaika/architectured/blob/e5caa5c7ae801d1aaac6e275b3ea0ef26d6ff26b/server/src/controller.rs
pub trait Intake<I>: 'static + Sync + Send {
    type To;
    fn emit(&self, input: I) -> Self::To;
}

/// Intake that may refuse its input, e.g. a request body failing validation.
pub trait TryIntake<I>: 'static + Sync + Send {
    type To;
    type Error;
    fn emit(&self, input: I) -> Result<Self::To, Self::Error>;
}

pub trait Exhaust<I>: 'static + Sync + Send {
    type To;
    fn emit(&self, input: I) -> Self::To;
}

pub struct Controller<T, P, I, D, O> {
    transformer: T,
    presenter: P,
    _i: PhantomData<I>,
    _t: PhantomData<D>,
    _o: PhantomData<O>,
}

impl<T, P, I, D, O> Controller<T, P, I, D, O> {
    pub fn new(transformer: T, presenter: P) -> Self {
        Self {
            transformer,
            presenter,
            _i: PhantomData,
            _t: PhantomData,
            _o: PhantomData,
        }
    }

    fn preset(self) -> P {
        self.presenter
    }
}

impl<T, P, I, D, O> Controller<T, P, I, D, O>
where
    T: Intake<I, To = D>,
{
    pub fn intake(self, input: I) -> Transformed<T, P, I, D, O> {
        Transformed {
            transformed: Intake::emit(&self.transformer, input),
            controller: self,
        }
    }
}

impl<T, P, I, D, O> Controller<T, P, I, D, O>
where
    T: TryIntake<I, To = D>,
{
    pub fn try_intake(self, input: I) -> Result<Transformed<T, P, I, D, O>, T::Error> {
        Ok(Transformed {
            transformed: TryIntake::emit(&self.transformer, input)?,
            controller: self,
        })
    }
}

pub struct Transformed<T, P, I, D, O> {
    transformed: D,
    controller: Controller<T, P, I, D, O>,
}

impl<T, P, I, D, O> Transformed<T, P, I, D, O>
where
    P: Exhaust<O>,
{
    pub async fn handle<F, Fut, E>(self, f: F) -> Result<P::To, E>
    where
        F: FnOnce(D) -> Fut,
        Fut: IntoFuture<Output = Result<O, E>>,
    {
        Ok(self.controller.preset().emit(f(self.transformed).await?))
    }
}

#[cfg(test)]
mod test {
    use super::{Controller, Exhaust, Intake, TryIntake};

    struct Doubler;

    impl Intake<i32> for Doubler {
        type To = i64;
        fn emit(&self, input: i32) -> Self::To {
            i64::from(input) * 2
        }
    }

    impl TryIntake<&'static str> for Doubler {
        type To = i64;
        type Error = String;
        fn emit(&self, input: &'static str) -> Result<Self::To, Self::Error> {
            input
                .parse::<i64>()
                .map(|value| value * 2)
                .map_err(|_| format!("not a number: {input}"))
        }
    }

    struct Printer;

    impl Exhaust<i64> for Printer {
        type To = String;
        fn emit(&self, input: i64) -> Self::To {
            format!("<{input}>")
        }
    }

    #[tokio::test]
    async fn intake_handle_and_present() {
        let presented = Controller::new(Doubler, Printer)
            .intake(21)
            .handle(|value| async move { Ok::<_, ()>(value + 1) })
            .await;
        assert_eq!(presented, Ok("<43>".to_string()));
    }

    #[tokio::test]
    async fn failed_try_intake_skips_handler() {
        let result = Controller::<_, _, _, _, i64>::new(Doubler, Printer).try_intake("x");
        assert!(matches!(result, Err(message) if message == "not a number: x"));
    }
}
