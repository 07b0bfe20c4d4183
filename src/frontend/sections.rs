use std::time::Duration;

use gloo_net::http::Request;
use wasm_bindgen_futures::spawn_local;
use web_sys::{HtmlInputElement, HtmlTextAreaElement, InputEvent, MouseEvent, SubmitEvent};
use yew::prelude::*;

use super::{hooks::use_ticker, web::scroll_to_selector};
use crate::{
    api::{ContactMessage, ContactReply, CONTACT_PATH},
    ui::{
        carousel::Carousel,
        contact_form::{ContactForm, Field, FormStatus},
        typewriter::{Typewriter, DEFAULT_PAUSE},
    },
};

const HERO_WORDS: [&str; 6] = ["Java", "React", "PHP", "Python", "Flask", "SAP CPI"];
const HERO_TYPING_SPEED: Duration = Duration::from_millis(150);

#[function_component(Hero)]
pub fn hero() -> Html {
    let typewriter = use_ticker(
        |now| {
            let words = HERO_WORDS.iter().map(ToString::to_string).collect();
            Typewriter::new(words, HERO_TYPING_SPEED, DEFAULT_PAUSE, now)
        },
        Typewriter::unmount,
    );
    let text = typewriter.read(|typewriter| typewriter.text().to_string());
    let on_explore = Callback::from(|_: MouseEvent| scroll_to_selector("#about"));

    html! {
        <section id="home" class="hero" aria-labelledby="hero-heading">
            <h1 id="hero-heading">{"Anshumaan Sharma"}</h1>
            <p class="hero-subtitle">
                {"Full-stack developer working in "}
                <span class="typewriter">{text}</span>
                <span class="typewriter-cursor" aria-hidden="true">{"|"}</span>
            </p>
            <button class="hero-cta" type="button" onclick={on_explore}>{"Explore my work"}</button>
        </section>
    }
}

#[function_component(About)]
pub fn about() -> Html {
    html! {
        <section id="about" class="section-block" aria-labelledby="about-heading">
            <h2 id="about-heading">{"About"}</h2>
            <p>
                {"MCA graduate building web platforms end to end, from relational schemas \
                  and REST APIs to the interfaces people use every day."}
            </p>
        </section>
    }
}

const SKILL_GROUPS: [(&str, &str); 4] = [
    ("Languages", "Java, Python, PHP, JavaScript, SQL"),
    ("Frontend", "React, Tailwind CSS, HTML, CSS"),
    ("Backend", "Flask, Node.js, JSP, JDBC"),
    ("Integration", "SAP CPI, REST APIs"),
];

#[function_component(Skills)]
pub fn skills() -> Html {
    html! {
        <section id="skills" class="section-block" aria-labelledby="skills-heading">
            <h2 id="skills-heading">{"Skills"}</h2>
            <ul class="inline-list">
                { for SKILL_GROUPS.iter().map(|(group, items)| html! {
                    <li><span class="muted">{*group}</span>{*items}</li>
                }) }
            </ul>
        </section>
    }
}

const PROJECTS: [(&str, &str); 3] = [
    ("Smart Waste Food Management & Donation Platform", "PHP, MySQL"),
    ("Mentor Connect", "React, Node.js, MongoDB"),
    ("Hospital Management System", "Java, Oracle SQL, JSP, JDBC"),
];

#[function_component(Projects)]
pub fn projects() -> Html {
    html! {
        <section id="projects" class="section-block" aria-labelledby="projects-heading">
            <h2 id="projects-heading">{"Projects"}</h2>
            <ul class="row-list">
                { for PROJECTS.iter().map(|(title, stack)| html! {
                    <li>{*title}<span class="muted">{format!(" ({stack})")}</span></li>
                }) }
            </ul>
        </section>
    }
}

const EXPERIENCE: [(&str, &str, &str); 2] = [
    ("Full Stack Developer", "GenZ AI Labs Pvt. Ltd.", "July 2025 to present"),
    ("Java Full Stack Development Intern", "Wipro TalentNext", "May to Sept 2024"),
];

#[function_component(Experience)]
pub fn experience() -> Html {
    html! {
        <section id="experience" class="section-block" aria-labelledby="experience-heading">
            <h2 id="experience-heading">{"Experience"}</h2>
            <ul class="row-list">
                { for EXPERIENCE.iter().map(|(title, company, period)| html! {
                    <li>
                        <strong>{*title}</strong>{format!(", {company}")}
                        <span class="muted">{format!(" ({period})")}</span>
                    </li>
                }) }
            </ul>
        </section>
    }
}

const EDUCATION: [(&str, &str, &str); 1] = [(
    "Master of Computer Applications (MCA)",
    "Galgotias University",
    "2023 to 2025",
)];

#[function_component(Education)]
pub fn education() -> Html {
    html! {
        <section id="education" class="section-block" aria-labelledby="education-heading">
            <h2 id="education-heading">{"Education"}</h2>
            <ul class="row-list">
                { for EDUCATION.iter().map(|(degree, institution, period)| html! {
                    <li>
                        <strong>{*degree}</strong>{format!(", {institution}")}
                        <span class="muted">{format!(" ({period})")}</span>
                    </li>
                }) }
            </ul>
        </section>
    }
}

const CERTIFICATIONS: [(&str, &str, &str); 4] = [
    ("Java Full Stack Development", "Wipro TalentNext", "2024"),
    ("Java Business Application Training", "IIT Bombay", "2025"),
    ("Java & Oracle Database Management", "GET IT Project Pvt. Ltd.", "2023"),
    ("Project Development Using Java", "Udemy", "2023"),
];

#[function_component(Certifications)]
pub fn certifications() -> Html {
    html! {
        <section
            id="certifications"
            class="section-block"
            aria-labelledby="certifications-heading"
        >
            <h2 id="certifications-heading">{"Certifications"}</h2>
            <ul class="row-list">
                { for CERTIFICATIONS.iter().map(|(title, issuer, year)| html! {
                    <li>
                        {*title}
                        <span class="muted">{format!(" ({issuer}, {year})")}</span>
                    </li>
                }) }
            </ul>
        </section>
    }
}

struct Testimonial {
    name: &'static str,
    role: &'static str,
    quote: &'static str,
}

static TESTIMONIALS: [Testimonial; 3] = [
    Testimonial {
        name: "Dr. Rajesh Kumar",
        role: "Engineering Lead",
        quote: "An exceptional full-stack developer with a keen eye for detail.",
    },
    Testimonial {
        name: "Prof. Anjali Sharma",
        role: "MCA Faculty",
        quote: "Consistently delivered high-quality projects that tackled real-world problems.",
    },
    Testimonial {
        name: "Vikram Singh",
        role: "Internship Mentor",
        quote: "Quickly grasped complex concepts and contributed meaningfully to our REST APIs.",
    },
];

#[function_component(Testimonials)]
pub fn testimonials() -> Html {
    let carousel = use_ticker(
        |now| Carousel::with_defaults(TESTIMONIALS.len(), now),
        Carousel::unmount,
    );
    let (index, auto_playing) =
        carousel.read(|carousel| (carousel.index(), carousel.is_auto_playing()));
    let Some(current) = TESTIMONIALS.get(index) else {
        return Html::default();
    };

    let on_previous = {
        let carousel = carousel.clone();
        Callback::from(move |_: MouseEvent| carousel.update(|carousel, now| carousel.previous(now)))
    };
    let on_next = {
        let carousel = carousel.clone();
        Callback::from(move |_: MouseEvent| carousel.update(|carousel, now| carousel.next(now)))
    };

    let dots = (0..TESTIMONIALS.len()).map(|target| {
        let carousel = carousel.clone();
        let onclick = Callback::from(move |_: MouseEvent| {
            carousel.update(|carousel, now| {
                carousel.jump(target, now);
            });
        });
        html! {
            <button
                class={classes!("carousel-dot", (target == index).then_some("is-active"))}
                type="button"
                aria-label={format!("Show testimonial {}", target + 1)}
                aria-current={(target == index).to_string()}
                {onclick}
            />
        }
    });

    html! {
        <section id="testimonials" class="section-block" aria-labelledby="testimonials-heading">
            <h2 id="testimonials-heading">{"Testimonials"}</h2>
            <figure class="testimonial" aria-live={if auto_playing { "off" } else { "polite" }}>
                <blockquote>{current.quote}</blockquote>
                <figcaption>
                    <strong>{current.name}</strong>
                    <span class="muted">{format!(", {}", current.role)}</span>
                </figcaption>
            </figure>
            <div class="carousel-controls">
                <button type="button" aria-label="Previous testimonial" onclick={on_previous}>
                    {"‹"}
                </button>
                { for dots }
                <button type="button" aria-label="Next testimonial" onclick={on_next}>
                    {"›"}
                </button>
            </div>
        </section>
    }
}

async fn post_contact(payload: &ContactMessage) -> Option<ContactReply> {
    let request = Request::post(CONTACT_PATH).json(payload).ok()?;
    let response = request.send().await.ok()?;
    response.json::<ContactReply>().await.ok()
}

fn field_value(event: &InputEvent) -> String {
    event
        .target_dyn_into::<HtmlInputElement>()
        .map(|input| input.value())
        .or_else(|| {
            event
                .target_dyn_into::<HtmlTextAreaElement>()
                .map(|area| area.value())
        })
        .unwrap_or_default()
}

#[function_component(Contact)]
pub fn contact() -> Html {
    let form = use_ticker(|_| ContactForm::default(), ContactForm::unmount);
    let (name, email, message, status) = form.read(|form| {
        (
            form.name.clone(),
            form.email.clone(),
            form.message.clone(),
            form.status().clone(),
        )
    });

    let on_input = |field: Field| {
        let form = form.clone();
        Callback::from(move |event: InputEvent| {
            let value = field_value(&event);
            form.update(|form, _| form.set_field(field, value));
        })
    };

    let on_submit = {
        let form = form.clone();
        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();
            let Some(payload) = form.update(|form, _| form.begin_submit()) else {
                return;
            };

            let form = form.clone();
            spawn_local(async move {
                let reply = post_contact(&payload).await;
                form.update(|form, now| form.finish_submit(reply, now));
            });
        })
    };

    let sending = status == FormStatus::Sending;
    let status_class = match &status {
        FormStatus::Idle => None,
        FormStatus::Sending => Some("is-sending"),
        FormStatus::Sent => Some("is-success"),
        FormStatus::Failed(_) => Some("is-error"),
    };

    html! {
        <section id="contact" class="section-block" aria-labelledby="contact-heading">
            <h2 id="contact-heading">{"Contact"}</h2>
            <form class="contact-form" onsubmit={on_submit}>
                <label for="contact-name">{"Name"}</label>
                <input
                    id="contact-name"
                    type="text"
                    required=true
                    value={name}
                    oninput={on_input(Field::Name)}
                />
                <label for="contact-email">{"Email"}</label>
                <input
                    id="contact-email"
                    type="email"
                    required=true
                    value={email}
                    oninput={on_input(Field::Email)}
                />
                <label for="contact-message">{"Message"}</label>
                <textarea
                    id="contact-message"
                    rows="5"
                    required=true
                    value={message}
                    oninput={on_input(Field::Message)}
                />
                <button type="submit" disabled={sending}>
                    { if sending { "Sending..." } else { "Send message" } }
                </button>
                <p class={classes!("form-status", status_class)} role="status" aria-live="polite">
                    {status.message().to_string()}
                </p>
            </form>
        </section>
    }
}

#[function_component(Footer)]
pub fn footer() -> Html {
    let year = js_sys::Date::new_0().get_full_year();

    html! {
        <footer class="site-footer">
            <span>{format!("© {year} Anshumaan Sharma. All rights reserved.")}</span>
            <a
                class="link"
                href="https://github.com/anshumaan-sharma"
                target="_blank"
                rel="noopener noreferrer"
            >
                {"GitHub"}
            </a>
        </footer>
    }
}
