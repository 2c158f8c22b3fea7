use crate::{
    error::{Result, StudioError},
    models::{CarouselSlide, GeneratedImage, ImageOptions, SlidePlan},
    service::ModelService,
};
use futures::future::join_all;
use std::sync::Arc;

/// Renders every planned slide concurrently. All slides succeed or none are
/// returned.
#[derive(Clone)]
pub struct CarouselSynthesizer {
    service: Arc<dyn ModelService>,
    options: ImageOptions,
}

impl CarouselSynthesizer {
    pub fn new(service: Arc<dyn ModelService>, options: ImageOptions) -> Self {
        Self { service, options }
    }

    pub async fn synthesize(&self, plans: &[SlidePlan]) -> Result<Vec<CarouselSlide>> {
        log::info!("Synthesizing {} carousel slide(s)", plans.len());

        let requests = plans.iter().enumerate().map(|(idx, plan)| async move {
            let images = self
                .service
                .generate_image_from_text(&plan.image_instruction, &self.options)
                .await?;
            let image = images.first().ok_or_else(|| {
                StudioError::ResponseError(format!("slide {} returned no image", idx + 1))
            })?;

            Ok::<_, StudioError>(CarouselSlide {
                image_url: GeneratedImage::from_inline(image).data_url,
                title: plan.title.clone(),
                body: plan.body.clone(),
            })
        });

        // join_all keeps input order regardless of completion order.
        let results = join_all(requests).await;

        let mut slides = Vec::with_capacity(results.len());
        let mut failed = Vec::new();
        for (idx, result) in results.into_iter().enumerate() {
            match result {
                Ok(slide) => slides.push(slide),
                Err(e) => {
                    log::error!("Carousel slide {} failed: {}", idx + 1, e);
                    failed.push(idx + 1);
                }
            }
        }

        if !failed.is_empty() {
            return Err(StudioError::SynthesisFailed(format!(
                "{} of {} slide(s) failed",
                failed.len(),
                plans.len()
            )));
        }

        log::info!("All {} carousel slide(s) generated", slides.len());
        Ok(slides)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{slide_payload, Call, ScriptedModel};
    use std::time::Duration;

    fn plans(prompts: &[&str]) -> Vec<SlidePlan> {
        prompts.iter().map(|p| SlidePlan::new(*p)).collect()
    }

    fn synthesizer(model: Arc<ScriptedModel>) -> CarouselSynthesizer {
        CarouselSynthesizer::new(model, ImageOptions::default())
    }

    #[tokio::test]
    async fn test_order_follows_plan_not_completion() {
        let model = Arc::new(
            ScriptedModel::new()
                .delay_slide("slide zero", Duration::from_millis(60))
                .delay_slide("slide one", Duration::from_millis(30)),
        );

        let slides = synthesizer(model.clone())
            .synthesize(&plans(&["slide zero", "slide one", "slide two"]))
            .await
            .unwrap();

        assert_eq!(slides.len(), 3);
        for (slide, prompt) in slides.iter().zip(["slide zero", "slide one", "slide two"]) {
            assert_eq!(
                slide.image_url,
                format!("data:image/png;base64,{}", slide_payload(prompt))
            );
        }
        assert_eq!(model.max_in_flight(), 3);
    }

    #[tokio::test]
    async fn test_each_slide_uses_only_its_own_instruction() {
        let model = Arc::new(ScriptedModel::new());
        let options = ImageOptions {
            count: 1,
            output_format: "image/jpeg".into(),
            aspect_ratio: "4:5".into(),
        };

        let mut plan = SlidePlan::new("Robot opens a cookbook");
        plan.title = Some("Day one".into());
        let slides = CarouselSynthesizer::new(model.clone(), options.clone())
            .synthesize(&[plan])
            .await
            .unwrap();

        assert_eq!(slides[0].title.as_deref(), Some("Day one"));
        assert!(slides[0].image_url.starts_with("data:image/jpeg;base64,"));
        let Call::ImageFromText {
            prompt,
            options: sent,
        } = &model.calls()[0]
        else {
            panic!("expected a text-to-image call");
        };
        assert_eq!(prompt, "Robot opens a cookbook");
        assert_eq!(sent, &options);
    }

    #[tokio::test]
    async fn test_one_failure_fails_the_batch() {
        let model = Arc::new(ScriptedModel::new().fail_slide("second", "internal error"));

        let err = synthesizer(model.clone())
            .synthesize(&plans(&["first", "second", "third"]))
            .await
            .unwrap_err();

        assert!(matches!(err, StudioError::SynthesisFailed(_)));
        // every request still ran to completion
        assert_eq!(model.call_count(), 3);
    }

    #[tokio::test]
    async fn test_zero_images_fails_the_batch() {
        let model = Arc::new(ScriptedModel::new().empty_slide("third"));

        let err = synthesizer(model)
            .synthesize(&plans(&["first", "second", "third"]))
            .await
            .unwrap_err();
        assert!(matches!(err, StudioError::SynthesisFailed(_)));
    }

    #[tokio::test]
    async fn test_empty_plan_synthesizes_nothing() {
        let model = Arc::new(ScriptedModel::new());
        let slides = synthesizer(model.clone()).synthesize(&[]).await.unwrap();
        assert!(slides.is_empty());
        assert_eq!(model.call_count(), 0);
    }
}
