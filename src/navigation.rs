//! The navigation bar shown at the top of every page, and at the bottom on small screens.

use maud::{Markup, html};

use crate::endpoints;

/// A link in the navigation bar.
///
/// Only one link should be marked as current at any one time.
struct Link {
    url: &'static str,
    title: &'static str,
    is_current: bool,
}

const LINKS: [(&str, &str); 5] = [
    (endpoints::DASHBOARD_VIEW, "Dashboard"),
    (endpoints::NEW_ENTRY_VIEW, "New Entry"),
    (endpoints::RECURRENCES_VIEW, "Recurring"),
    (endpoints::ACCOUNTS_VIEW, "Accounts"),
    (endpoints::IMPORT_VIEW, "Import"),
];

const DESKTOP_LINK_STYLE: &str = "block py-2 px-3 text-gray-900 rounded-sm \
    hover:bg-gray-100 lg:hover:bg-transparent lg:hover:text-blue-700 lg:p-0 \
    dark:text-white lg:dark:hover:text-blue-500";
const DESKTOP_CURRENT_LINK_STYLE: &str = "block py-2 px-3 text-white bg-blue-700 \
    rounded-sm lg:bg-transparent lg:text-blue-700 lg:p-0 dark:text-white lg:dark:text-blue-500";
const BOTTOM_LINK_STYLE: &str = "flex w-full min-w-0 items-center justify-center \
    rounded-lg px-2 py-2 text-xs font-semibold text-gray-600 \
    hover:bg-blue-50/70 hover:text-blue-700 dark:text-gray-300";
const BOTTOM_CURRENT_LINK_STYLE: &str = "flex w-full min-w-0 items-center justify-center \
    rounded-lg bg-blue-50 px-2 py-2 text-xs font-semibold text-blue-700 \
    shadow-sm dark:bg-blue-900/30 dark:text-blue-200";

/// The links shown in the navigation bar.
pub struct NavBar {
    links: Vec<Link>,
}

impl NavBar {
    /// Get the navigation bar.
    ///
    /// If a link matches `active_endpoint`, then that link will be
    /// marked as active and displayed differently in the HTML.
    pub fn new(active_endpoint: &str) -> NavBar {
        let links = LINKS
            .into_iter()
            .map(|(url, title)| Link {
                url,
                title,
                is_current: url == active_endpoint,
            })
            .collect();

        NavBar { links }
    }

    /// Render the navigation bar for desktop and mobile.
    pub fn into_html(self) -> Markup {
        html!(
            nav class="bg-white border-gray-200 dark:bg-gray-900"
            {
                div class="max-w-screen-xl flex flex-wrap items-center justify-between mx-auto p-4"
                {
                    a href=(endpoints::ROOT) class="flex items-center"
                    {
                        span class="self-center text-2xl font-semibold whitespace-nowrap dark:text-white"
                        {
                            "Sentinel Ledger"
                        }
                    }

                    div class="hidden w-full lg:block lg:w-auto"
                    {
                        ul class="font-medium flex flex-col lg:flex-row lg:space-x-8"
                        {
                            @for link in &self.links {
                                li
                                {
                                    a
                                        href=(link.url)
                                        class=(if link.is_current { DESKTOP_CURRENT_LINK_STYLE } else { DESKTOP_LINK_STYLE })
                                        aria-current=[link.is_current.then_some("page")]
                                    {
                                        (link.title)
                                    }
                                }
                            }
                        }
                    }
                }
            }

            nav class="fixed inset-x-0 bottom-0 z-40 lg:hidden"
            {
                ul
                    class="grid grid-cols-5 gap-1 mx-4 mb-4 px-2 py-2 rounded-xl border border-gray-200 bg-white/95 shadow-lg dark:border-gray-700 dark:bg-gray-900/95"
                    aria-label="Primary"
                {
                    @for link in &self.links {
                        li class="min-w-0"
                        {
                            a
                                href=(link.url)
                                class=(if link.is_current { BOTTOM_CURRENT_LINK_STYLE } else { BOTTOM_LINK_STYLE })
                            {
                                span class="truncate" { (link.title) }
                            }
                        }
                    }
                }
            }
        )
    }
}

#[cfg(test)]
mod nav_bar_tests {
    use scraper::{Html, Selector};

    use crate::{endpoints, navigation::NavBar};

    #[test]
    fn marks_only_the_active_endpoint() {
        let cases = [
            (endpoints::DASHBOARD_VIEW, true),
            (endpoints::NEW_ENTRY_VIEW, true),
            (endpoints::RECURRENCES_VIEW, true),
            (endpoints::ACCOUNTS_VIEW, true),
            (endpoints::IMPORT_VIEW, true),
            (endpoints::ROOT, false),
            (endpoints::ENTRIES_API, false),
            (endpoints::INTERNAL_ERROR_VIEW, false),
        ];

        for (endpoint, should_be_active) in cases {
            let nav_bar = NavBar::new(endpoint);

            for link in &nav_bar.links {
                let want = should_be_active && link.url == endpoint;
                assert_eq!(
                    link.is_current, want,
                    "link {} with active endpoint {endpoint}",
                    link.url
                );
            }
        }
    }

    #[test]
    fn renders_aria_current_for_active_link() {
        let html = NavBar::new(endpoints::ACCOUNTS_VIEW).into_html().into_string();
        let fragment = Html::parse_fragment(&html);
        let selector = Selector::parse("a[aria-current=page]").unwrap();

        let current: Vec<_> = fragment
            .select(&selector)
            .filter_map(|link| link.value().attr("href"))
            .collect();

        assert_eq!(current, vec![endpoints::ACCOUNTS_VIEW]);
    }
}
