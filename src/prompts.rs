//! Prompt construction
//!
//! Every request type that reaches the completion service implements
//! [`TravelPrompt`]. The assistant profile is shared by all of them and is
//! sent as the system message.

use std::sync::LazyLock;

use crate::agent::Operation;
use crate::models::{ModifyRequest, QuestionRequest, TravelPreferences};

/// Static description of the assistant the completion service plays
#[derive(Debug)]
pub struct AssistantProfile {
    pub name: &'static str,
    pub instructions: &'static [&'static str],
}

pub const ASSISTANT: AssistantProfile = AssistantProfile {
    name: "Comprehensive Travel Assistant",
    instructions: &[
        "You are a comprehensive travel planning assistant with expertise in all aspects of travel.",
        "For every recommendation and data point, you MUST provide working source links.",
        "Your knowledge spans across:",
        "- Seasonal travel timing and weather patterns",
        "- Transportation options and booking",
        "- Accommodation recommendations",
        "- Day-by-day itinerary planning",
        "- Local cuisine and restaurant recommendations",
        "- Practical travel tips and cultural advice",
        "- Budget estimation and cost breakdown",
        "Format all responses in markdown with clear headings (##) and bullet points.",
        "Use [text](url) format for all hyperlinks.",
        "Verify all links are functional before including them.",
        "Organize information clearly with appropriate sections based on the query type.",
    ],
};

impl AssistantProfile {
    /// Render the profile as a system message
    #[must_use]
    pub fn system_prompt(&self) -> String {
        let mut prompt = format!("Your name is {}.\n", self.name);
        prompt.push_str(&self.instructions.join("\n"));
        prompt
    }
}

/// System message for every completion call, rendered once
pub static SYSTEM_PROMPT: LazyLock<String> = LazyLock::new(|| ASSISTANT.system_prompt());

/// A request that can be turned into a completion prompt
pub trait TravelPrompt {
    /// Which agent operation this request drives
    const OPERATION: Operation;

    /// Build the user prompt, failing on input that cannot be planned for
    fn build_prompt(&self) -> crate::Result<String>;
}

impl TravelPrompt for TravelPreferences {
    const OPERATION: Operation = Operation::GeneratePlan;

    fn build_prompt(&self) -> crate::Result<String> {
        let dates = self.trip_dates()?;
        let days = dates.duration_days();
        let start = dates.start();
        let end = dates.end();
        let destination = &self.destination;
        let budget = &self.budget;
        let styles = self.joined_styles();
        let origin = if self.present_location.trim().is_empty() {
            "the traveler's home city"
        } else {
            self.present_location.as_str()
        };

        Ok(format!(
            "Act as a Personalized Travel Expert
You are a travel expert specializing in creating tailored, detailed travel plans. \
Design a comprehensive itinerary for a trip to {destination} spanning {days} days, \
starting on {start} and ending on {end}.

Traveler Preferences:
Budget Level: {budget}
Travel Styles: {styles}

Your Task:
Provide a structured markdown response that includes the following elements:

🌞 Best Time to Visit:
 - Highlight seasonal considerations for visiting {destination}.
 - Day-by-day weather forecast from {start} to {end}.
 - Alternative date suggestions if weather is unfavorable.
 - Include source links for all weather data.
 - Offer clothing recommendations for each day based on weather forecasts.

🏨 Accommodation Recommendations:
 - Suggest accommodations within the {budget} range.
 - Include pros and cons, prices, amenities, and booking links.
 - Indicate the distance and travel time to major attractions. Include map links where possible.

🗺️ Day-by-Day Itinerary:
 - Create a detailed itinerary for each day, broken into specific time slots (e.g., \"9:00 AM-12:00 PM: Visit [Attraction]\").
 - Incorporate activities, attractions, and cultural experiences that align with the travel styles: {styles}.
 - Include booking links, costs, and recommendations for optimizing time and enjoyment.

🍽️ Culinary Highlights:
 - Recommend local cuisines, restaurants, and food experiences.
 - Provide suggestions based on the travel styles (e.g., street food, fine dining, or unique culinary tours).
 - Include price ranges, opening hours, and reservation links, where available.

💡 Practical Travel Tips:
 - List local and intercity transportation options (e.g., public transit, car rentals, taxis).
 - Provide advice on cultural etiquette, local customs, and safety tips.
 - Include a suggested daily budget breakdown for meals, transport, and activities.

💰 Estimated Total Trip Cost:
 - Provide an itemized expense breakdown by category according to the {budget} budget level.
 - Accommodation, transportation, meals, activities, and miscellaneous expenses.
 - Offer budget-saving tips specific to {budget} constraints.

🚂 Transportation Details:
 - Recommend transportation options from {origin} to {destination}.
 - Include schedules, pricing, duration, and booking links for trains, buses, or flights.

Output Requirements:
 - Use clear, easy-to-read markdown with headings and bullet points for each section.
 - Provide source links, booking references, and maps wherever applicable.
 - Ensure all details are actionable and well-organized to facilitate ease of planning."
        ))
    }
}

impl TravelPrompt for QuestionRequest {
    const OPERATION: Operation = Operation::AnswerQuestion;

    fn build_prompt(&self) -> crate::Result<String> {
        Ok(format!(
            "Using the context of this travel plan for {destination}:

{plan}

Please answer this specific question: {question}

Guidelines for your response:
1. Focus specifically on answering the question asked
2. Reference relevant parts of the travel plan when applicable
3. Provide new information if the travel plan doesn't cover the topic
4. Include verified source links for any new information
5. Keep the response concise but comprehensive
6. Use markdown formatting for clarity

Format your response with appropriate headings and verify all included links.",
            destination = self.destination,
            plan = self.travel_plan,
            question = self.question,
        ))
    }
}

impl TravelPrompt for ModifyRequest {
    const OPERATION: Operation = Operation::ModifyPlan;

    fn build_prompt(&self) -> crate::Result<String> {
        Ok(format!(
            "Modify the following travel plan based on the specified changes:

Original Travel Plan:
{plan}

Modifications:
{modifications}

Guidelines:
1. Integrate changes seamlessly into the existing plan.
2. Maintain the original structure and formatting.
3. Provide source links for any new information added.
4. Ensure all details are accurate and up-to-date.

Return the updated travel plan in markdown format.",
            plan = self.travel_plan,
            modifications = self.modifications,
        ))
    }
}
